use ahash::AHashSet;
use rand::{Rng, rngs::StdRng};

use crate::{
    batch::BatchContext,
    config::LoaderConfig,
    errors::GraphLoaderError,
    serializer::{self, RecordTemplate},
    store::GraphStore,
};

/// Seed assignment for a whole run, computed once and read by every batch.
///
/// In partitioned mode each candidate carries an immutable partition key:
/// its stable id, or a uniformly random value in `[0, N)` when shuffling.
/// In explicit mode the resolved input vertices seed every batch verbatim.
#[derive(Debug)]
pub enum SeedPlan {
    Explicit(Vec<i64>),
    Partitioned(Vec<(i64, i64)>),
}

pub fn build_plan(
    store: &GraphStore,
    config: &LoaderConfig,
    rng: &mut StdRng,
) -> Result<SeedPlan, GraphLoaderError> {
    if !config.input_vertices.is_empty() {
        let mut seen = AHashSet::new();
        let mut ids = Vec::with_capacity(config.input_vertices.len());
        for vertex in &config.input_vertices {
            let id = store.resolve_ref(vertex)?;
            if seen.insert(id) {
                ids.push(id);
            }
        }
        return Ok(SeedPlan::Explicit(ids));
    }
    let candidates = store.vertex_ids_by_types(config.candidate_types())?;
    let population = candidates.len() as i64;
    let keyed = candidates
        .into_iter()
        .map(|id| {
            let key = if config.shuffle {
                rng.gen_range(0..population.max(1))
            } else {
                id
            };
            (id, key)
        })
        .collect();
    Ok(SeedPlan::Partitioned(keyed))
}

/// Selects the seed set of one batch and serializes every seed into the
/// batch context before expansion begins.
pub fn select_seeds(
    store: &GraphStore,
    config: &LoaderConfig,
    plan: &SeedPlan,
    ctx: &mut BatchContext,
    template: &RecordTemplate,
) -> Result<Vec<i64>, GraphLoaderError> {
    let batch_id = ctx.batch_id() as i64;
    let mut seeds = Vec::new();
    match plan {
        SeedPlan::Explicit(ids) => seeds.extend_from_slice(ids),
        SeedPlan::Partitioned(keyed) => {
            for &(id, key) in keyed {
                if key % config.num_batches as i64 != batch_id {
                    continue;
                }
                if let Some(attr) = &config.filter_by {
                    let vertex = store.get_vertex(id)?;
                    if !serializer::boolean_attribute(&vertex, attr)? {
                        continue;
                    }
                }
                seeds.push(id);
            }
        }
    }
    for &id in &seeds {
        let vertex = store.get_vertex(id)?;
        ctx.record_vertex(&vertex, true, template)?;
    }
    Ok(seeds)
}
