use tracing::{debug, warn};

use crate::{
    config::{BrokerAuth, StreamTarget},
    serializer::BatchPayload,
};

/// Publish return code reserved by the broker bridge for features that need
/// a privileged runtime. Distinct from ordinary delivery failures and never
/// retried.
pub const UPGRADE_REQUIRED_CODE: i32 = 777;

/// Producer side of the message broker. The pipeline only depends on this
/// seam; the broker itself is an external collaborator. A call blocks until
/// the broker accepts or rejects the payload and reports a return code:
/// `0` success, [`UPGRADE_REQUIRED_CODE`] for configuration-restricted
/// runtimes, anything else a generic delivery failure.
pub trait BrokerProducer {
    fn publish(&mut self, topic: &str, key: &str, payload: &str, auth: &BrokerAuth) -> i32;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    Delivered,
    UpgradeRequired,
    Failed(i32),
}

impl PublishOutcome {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => PublishOutcome::Delivered,
            UPGRADE_REQUIRED_CODE => PublishOutcome::UpgradeRequired,
            other => PublishOutcome::Failed(other),
        }
    }
}

/// Publishes one batch: vertex payload first, then edge payload. Every
/// non-success outcome appends one message to the run-scoped error log and
/// the run moves on; nothing here aborts or retries.
pub fn publish_batch(
    producer: &mut dyn BrokerProducer,
    target: &StreamTarget,
    payload: &BatchPayload,
    errors: &mut Vec<String>,
) {
    let artifacts = [
        (format!("vertex_batch_{}", payload.batch_id), &payload.vertex_batch),
        (format!("edge_batch_{}", payload.batch_id), &payload.edge_batch),
    ];
    for (key, body) in artifacts {
        let code = producer.publish(&target.topic, &key, body, &target.auth);
        match PublishOutcome::from_code(code) {
            PublishOutcome::Delivered => {
                debug!(key = key.as_str(), topic = target.topic.as_str(), "published");
            }
            PublishOutcome::UpgradeRequired => {
                warn!(key = key.as_str(), "publish rejected: upgrade required");
                errors.push(format!(
                    "{key}: streaming requires an upgraded graph runtime (code {UPGRADE_REQUIRED_CODE})"
                ));
            }
            PublishOutcome::Failed(code) => {
                warn!(key = key.as_str(), code, "publish failed");
                errors.push(format!("{key}: publish failed with code {code}"));
            }
        }
    }
}
