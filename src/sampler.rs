use ahash::AHashSet;
use rand::{rngs::StdRng, seq::SliceRandom};

use crate::{
    batch::BatchContext,
    config::LoaderConfig,
    errors::GraphLoaderError,
    serializer::RecordTemplate,
    store::{Edge, GraphStore, Vertex},
};

/// Expands the seed frontier outward for `num_hops` hops, sampling up to
/// `num_neighbors` eligible outgoing edges per frontier vertex per hop,
/// without replacement. Sampled edges and their endpoints are serialized
/// through the batch's dedup sets; destinations become the next frontier.
pub fn expand(
    store: &GraphStore,
    config: &LoaderConfig,
    ctx: &mut BatchContext,
    seeds: Vec<i64>,
    rng: &mut StdRng,
    template: &RecordTemplate,
) -> Result<(), GraphLoaderError> {
    let e_lookup = into_lookup(&config.e_types);
    let v_lookup = into_lookup(&config.v_types);

    let mut frontier = seeds;
    for _ in 0..config.num_hops {
        let mut next = Vec::new();
        let mut reached = AHashSet::new();
        for &source in &frontier {
            let eligible =
                eligible_edges(store, source, e_lookup.as_ref(), v_lookup.as_ref())?;
            if eligible.is_empty() {
                // Zero eligible out-degree is a dead end, not an error.
                continue;
            }
            for (edge, destination) in
                eligible.choose_multiple(rng, config.num_neighbors)
            {
                ctx.record_edge(edge, template)?;
                if !ctx.vertex_printed(edge.from_id) {
                    let endpoint = store.get_vertex(edge.from_id)?;
                    ctx.record_vertex(&endpoint, false, template)?;
                }
                ctx.record_vertex(destination, false, template)?;
                if reached.insert(destination.id) {
                    next.push(destination.id);
                }
            }
        }
        next.sort_unstable();
        frontier = next;
    }
    Ok(())
}

/// Outgoing edges of `source` whose edge type and destination type pass the
/// run's type filters, paired with the destination vertex.
fn eligible_edges(
    store: &GraphStore,
    source: i64,
    e_lookup: Option<&AHashSet<&str>>,
    v_lookup: Option<&AHashSet<&str>>,
) -> Result<Vec<(Edge, Vertex)>, GraphLoaderError> {
    let mut eligible = Vec::new();
    for edge in store.outgoing_edges(source)? {
        if let Some(filter) = e_lookup {
            if !filter.contains(edge.edge_type.as_str()) {
                continue;
            }
        }
        let destination = store.get_vertex(edge.to_id)?;
        if let Some(filter) = v_lookup {
            if !filter.contains(destination.vertex_type.as_str()) {
                continue;
            }
        }
        eligible.push((edge, destination));
    }
    Ok(eligible)
}

fn into_lookup(items: &[String]) -> Option<AHashSet<&str>> {
    if items.is_empty() {
        None
    } else {
        Some(items.iter().map(|s| s.as_str()).collect())
    }
}
