use graphloader::{
    GraphLoaderError, GraphStore, LoaderConfig, RecordTemplate, Vertex, VertexRef,
    batch::BatchContext,
    seed::{self, SeedPlan},
};
use rand::{SeedableRng, rngs::StdRng};
use serde_json::json;

fn store_with_items(count: usize) -> (GraphStore, Vec<i64>) {
    let store = GraphStore::open_in_memory().expect("store");
    let mut ids = Vec::with_capacity(count);
    for idx in 0..count {
        let id = store
            .insert_vertex(&Vertex {
                id: 0,
                vertex_type: "Item".into(),
                key: format!("v{idx}"),
                data: json!({ "flag": idx % 2 == 0 }),
            })
            .expect("insert vertex");
        ids.push(id);
    }
    (store, ids)
}

fn seeds_for_batch(
    store: &GraphStore,
    config: &LoaderConfig,
    plan: &SeedPlan,
    batch_id: usize,
) -> Vec<i64> {
    let template = RecordTemplate::from_config(config);
    let mut ctx = BatchContext::new(batch_id, false);
    seed::select_seeds(store, config, plan, &mut ctx, &template).expect("select seeds")
}

#[test]
fn deterministic_partition_assigns_by_id_modulo() {
    let (store, ids) = store_with_items(10);
    let config = LoaderConfig {
        num_batches: 2,
        ..LoaderConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(7);
    let plan = seed::build_plan(&store, &config, &mut rng).expect("plan");

    let batch0 = seeds_for_batch(&store, &config, &plan, 0);
    let batch1 = seeds_for_batch(&store, &config, &plan, 1);

    let even: Vec<i64> = ids.iter().copied().filter(|id| id % 2 == 0).collect();
    let odd: Vec<i64> = ids.iter().copied().filter(|id| id % 2 == 1).collect();
    assert_eq!(batch0, even);
    assert_eq!(batch1, odd);
}

#[test]
fn shuffled_partition_is_a_disjoint_cover() {
    let (store, ids) = store_with_items(23);
    let config = LoaderConfig {
        num_batches: 4,
        shuffle: true,
        ..LoaderConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(99);
    let plan = seed::build_plan(&store, &config, &mut rng).expect("plan");

    let mut all = Vec::new();
    for batch_id in 0..config.num_batches {
        all.extend(seeds_for_batch(&store, &config, &plan, batch_id));
    }
    let total = all.len();
    all.sort_unstable();
    all.dedup();
    assert_eq!(total, ids.len(), "partitions must not overlap");
    assert_eq!(all, ids, "partitions must cover every candidate");
}

#[test]
fn partition_keys_are_stable_across_batches_of_one_run() {
    let (store, _ids) = store_with_items(16);
    let config = LoaderConfig {
        num_batches: 2,
        shuffle: true,
        ..LoaderConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(3);
    let plan = seed::build_plan(&store, &config, &mut rng).expect("plan");

    // Re-selecting the same batch from the same plan is idempotent.
    let first = seeds_for_batch(&store, &config, &plan, 0);
    let second = seeds_for_batch(&store, &config, &plan, 0);
    assert_eq!(first, second);
}

#[test]
fn filter_by_restricts_eligible_seeds() {
    let (store, ids) = store_with_items(10);
    let config = LoaderConfig {
        num_batches: 1,
        filter_by: Some("flag".into()),
        ..LoaderConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let plan = seed::build_plan(&store, &config, &mut rng).expect("plan");
    let seeds = seeds_for_batch(&store, &config, &plan, 0);

    // Vertices were flagged for even insert indices.
    let expected: Vec<i64> = ids.iter().copied().step_by(2).collect();
    assert_eq!(seeds, expected);
}

#[test]
fn filter_by_unknown_attribute_is_fatal() {
    let (store, _ids) = store_with_items(4);
    let config = LoaderConfig {
        num_batches: 1,
        filter_by: Some("nonexistent".into()),
        ..LoaderConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let plan = seed::build_plan(&store, &config, &mut rng).expect("plan");
    let template = RecordTemplate::from_config(&config);
    let mut ctx = BatchContext::new(0, false);
    let err = seed::select_seeds(&store, &config, &plan, &mut ctx, &template).unwrap_err();
    assert!(matches!(err, GraphLoaderError::AttributeError(_)));
}

#[test]
fn filter_by_non_boolean_attribute_is_fatal() {
    let store = GraphStore::open_in_memory().expect("store");
    store
        .insert_vertex(&Vertex {
            id: 0,
            vertex_type: "Item".into(),
            key: "v0".into(),
            data: json!({ "flag": "yes" }),
        })
        .expect("insert vertex");
    let config = LoaderConfig {
        num_batches: 1,
        filter_by: Some("flag".into()),
        ..LoaderConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let plan = seed::build_plan(&store, &config, &mut rng).expect("plan");
    let template = RecordTemplate::from_config(&config);
    let mut ctx = BatchContext::new(0, false);
    let err = seed::select_seeds(&store, &config, &plan, &mut ctx, &template).unwrap_err();
    assert!(matches!(err, GraphLoaderError::AttributeError(_)));
}

#[test]
fn seed_types_narrow_the_candidate_population() {
    let (store, ids) = store_with_items(4);
    store
        .insert_vertex(&Vertex {
            id: 0,
            vertex_type: "User".into(),
            key: "u0".into(),
            data: json!({}),
        })
        .expect("insert vertex");
    let config = LoaderConfig {
        num_batches: 1,
        seed_types: vec!["Item".into()],
        ..LoaderConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let plan = seed::build_plan(&store, &config, &mut rng).expect("plan");
    let seeds = seeds_for_batch(&store, &config, &plan, 0);
    assert_eq!(seeds, ids);
}

#[test]
fn explicit_input_vertices_seed_every_batch_verbatim() {
    let (store, ids) = store_with_items(6);
    let config = LoaderConfig {
        num_batches: 3,
        input_vertices: vec![
            VertexRef {
                key: "v1".into(),
                vertex_type: "Item".into(),
            },
            VertexRef {
                key: "v4".into(),
                vertex_type: "Item".into(),
            },
        ],
        ..LoaderConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let plan = seed::build_plan(&store, &config, &mut rng).expect("plan");

    let expected = vec![ids[1], ids[4]];
    for batch_id in 0..config.num_batches {
        assert_eq!(seeds_for_batch(&store, &config, &plan, batch_id), expected);
    }
}

#[test]
fn unknown_explicit_vertex_is_not_found() {
    let (store, _ids) = store_with_items(2);
    let config = LoaderConfig {
        input_vertices: vec![VertexRef {
            key: "ghost".into(),
            vertex_type: "Item".into(),
        }],
        ..LoaderConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let err = seed::build_plan(&store, &config, &mut rng).unwrap_err();
    assert!(matches!(err, GraphLoaderError::NotFound(_)));
}

#[test]
fn selected_seeds_are_serialized_with_the_seed_flag() {
    let (store, _ids) = store_with_items(4);
    let config = LoaderConfig {
        num_batches: 1,
        ..LoaderConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(1);
    let plan = seed::build_plan(&store, &config, &mut rng).expect("plan");
    let template = RecordTemplate::from_config(&config);
    let mut ctx = BatchContext::new(0, false);
    seed::select_seeds(&store, &config, &plan, &mut ctx, &template).expect("select seeds");
    let payload = ctx.into_payload();
    let lines: Vec<&str> = payload.vertex_batch.lines().collect();
    assert_eq!(lines.len(), 4);
    for line in lines {
        assert!(line.ends_with(",true"), "seed record missing flag: {line}");
    }
}
