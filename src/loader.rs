use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::{
    batch::BatchContext,
    config::LoaderConfig,
    errors::GraphLoaderError,
    sampler,
    seed,
    serializer::{BatchPayload, RecordTemplate},
    sink::{self, BrokerProducer},
    store::GraphStore,
};

/// Result of a whole run. Direct mode hands every batch payload back to the
/// caller; streaming mode hands back only the accumulated error log, the
/// payloads having gone to the broker.
#[derive(Debug)]
pub enum LoaderOutput {
    Direct(Vec<BatchPayload>),
    Streamed { errors: Vec<String> },
}

/// Runs the batch pipeline: for every batch id in ascending order, select
/// seeds, expand them hop by hop, render the deduplicated subgraph, and
/// dispatch it. Batches are strictly sequential; the partition keys are
/// assigned once up front and reused by every batch.
pub fn run_loader(
    store: &GraphStore,
    config: &LoaderConfig,
    mut producer: Option<&mut dyn BrokerProducer>,
) -> Result<LoaderOutput, GraphLoaderError> {
    config.validate()?;
    if config.stream.is_some() && producer.is_none() {
        return Err(GraphLoaderError::invalid_input(
            "streaming mode requires a broker producer",
        ));
    }

    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let template = RecordTemplate::from_config(config);
    let plan = seed::build_plan(store, config, &mut rng)?;
    let track_id_map = !config.input_vertices.is_empty();

    let mut batches = Vec::new();
    let mut errors = Vec::new();
    for batch_id in 0..config.num_batches {
        let mut ctx = BatchContext::new(batch_id, track_id_map);
        let seeds = seed::select_seeds(store, config, &plan, &mut ctx, &template)?;
        debug!(batch_id, seeds = seeds.len(), "expanding batch");
        sampler::expand(store, config, &mut ctx, seeds, &mut rng, &template)?;
        let payload = ctx.into_payload();
        match (&config.stream, producer.as_deref_mut()) {
            (Some(target), Some(producer)) => {
                sink::publish_batch(producer, target, &payload, &mut errors);
            }
            _ => batches.push(payload),
        }
    }

    if config.stream.is_some() {
        info!(
            batches = config.num_batches,
            failures = errors.len(),
            "streaming run finished"
        );
        Ok(LoaderOutput::Streamed { errors })
    } else {
        Ok(LoaderOutput::Direct(batches))
    }
}
