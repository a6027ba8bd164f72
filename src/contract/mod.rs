//! Consumer-driven contract between [`AdminClient`](crate::client::AdminClient)
//! and the category resource.
//!
//! The consumer side tests the client against [`MockProvider`]; the provider
//! side replays the same interactions against a running server with
//! [`verify_provider`].

pub mod interactions;
pub mod matcher;
pub mod mock_provider;
pub mod verifier;

pub use interactions::{
    admin_client_contract, admin_client_interactions, Contract, ContractRequest,
    ContractResponse, Fixtures, Interaction,
};
pub use matcher::{matches_shape, ShapeMismatch};
pub use mock_provider::MockProvider;
pub use verifier::{verify_provider, InteractionOutcome, VerificationReport};
