//! # Block Locator Service
//!
//! Binds a header source to a locator configuration.

use shared_types::ExecutionHeader;
use tracing::info;

use crate::algorithms::find_block_nearest_time;
use crate::config::LocatorConfig;
use crate::domain::LocatorError;
use crate::ports::HeaderSource;

/// Block locator over one execution client.
pub struct BlockLocator<S: HeaderSource> {
    source: S,
    config: LocatorConfig,
}

impl<S: HeaderSource> BlockLocator<S> {
    /// Create a locator.
    pub fn new(source: S, config: LocatorConfig) -> Self {
        Self { source, config }
    }

    /// The underlying header source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Locator configuration.
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Nearest header to `target_time` at or after `deploy_block`.
    pub async fn find_block_nearest_time(
        &self,
        target_time: u64,
        deploy_block: u64,
    ) -> Result<ExecutionHeader, LocatorError> {
        let header =
            find_block_nearest_time(target_time, deploy_block, &self.source, &self.config).await?;

        info!(
            target_time,
            block = header.number,
            timestamp = header.timestamp,
            endpoint = self.source.endpoint(),
            "[rw-01] Located snapshot block"
        );

        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockHeaderSource;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_locator_over_shared_source() {
        let source: Arc<dyn HeaderSource> = Arc::new(MockHeaderSource::regular(200, 0, 12));
        let locator = BlockLocator::new(source, LocatorConfig::for_testing());

        let header = locator.find_block_nearest_time(1_200, 0).await.unwrap();
        assert_eq!(header.number, 100);
        assert_eq!(header.timestamp, 1_200);
    }
}
