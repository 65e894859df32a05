use crate::matching::profile::{CollaboratorId, CollaboratorProfile};
use crate::partnerships::domain::{
    Contract, ContractId, Partnership, PartnershipId, Payment, PaymentId,
};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for collaborator profiles.
pub trait ProfileRepository: Send + Sync {
    fn insert(&self, profile: CollaboratorProfile) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CollaboratorId) -> Result<Option<CollaboratorProfile>, RepositoryError>;
    fn update(&self, profile: CollaboratorProfile) -> Result<(), RepositoryError>;
}

/// Storage abstraction for partnerships so the lifecycle engine can be
/// exercised against fakes and swapped onto durable storage later.
pub trait PartnershipRepository: Send + Sync {
    fn insert(&self, partnership: Partnership) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PartnershipId) -> Result<Option<Partnership>, RepositoryError>;
    fn update(&self, partnership: Partnership) -> Result<(), RepositoryError>;
    /// All partnerships initiated by the given collaborator.
    fn for_initiator(&self, id: &CollaboratorId) -> Result<Vec<Partnership>, RepositoryError>;
}

/// Storage abstraction for generated contracts.
pub trait ContractRepository: Send + Sync {
    fn insert_contract(&self, contract: Contract) -> Result<(), RepositoryError>;
    fn fetch_contract(&self, id: &ContractId) -> Result<Option<Contract>, RepositoryError>;
    fn update_contract(&self, contract: Contract) -> Result<(), RepositoryError>;
}

/// Storage abstraction for payments.
pub trait PaymentRepository: Send + Sync {
    fn insert_payment(&self, payment: Payment) -> Result<(), RepositoryError>;
    fn fetch_payment(&self, id: &PaymentId) -> Result<Option<Payment>, RepositoryError>;
    fn update_payment(&self, payment: Payment) -> Result<(), RepositoryError>;
}
