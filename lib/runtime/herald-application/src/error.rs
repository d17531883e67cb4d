use herald_domain::{DeploymentId, StoreError};

/// A message referenced a payload field that was not supplied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("payload is missing `{0}`")]
pub struct MissingField(pub &'static str);

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    MissingField(#[from] MissingField),

    #[error("no start record for deployment {0}: RUNNING was never observed")]
    MissingCorrelation(DeploymentId),

    #[error("start record for deployment {id} is corrupt: {value}")]
    CorruptRecord { id: DeploymentId, value: String },

    #[error(transparent)]
    Store(StoreError),
}

impl TrackerError {
    fn from_store(id: &DeploymentId, err: StoreError) -> Self {
        match err {
            StoreError::Corrupt { value, .. } => TrackerError::CorruptRecord {
                id: id.clone(),
                value,
            },
            other => TrackerError::Store(other),
        }
    }
}

pub(crate) trait StoreResultExt<T> {
    fn for_deployment(self, id: &DeploymentId) -> Result<T, TrackerError>;
}

impl<T> StoreResultExt<T> for Result<T, StoreError> {
    fn for_deployment(self, id: &DeploymentId) -> Result<T, TrackerError> {
        self.map_err(|err| TrackerError::from_store(id, err))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    MissingField(#[from] MissingField),

    #[error("failed to dispatch alert: {0}")]
    Dispatch(anyhow::Error),
}
