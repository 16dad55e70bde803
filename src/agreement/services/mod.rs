//! Application services for agreement lifecycle orchestration.

mod dispatcher;
mod email;
mod lifecycle;

pub use dispatcher::AgreementEffectDispatcher;
pub use email::{AGREEMENT_READY_SUBJECT, render_agreement_ready};
pub use lifecycle::{
    AgreementFailureKind, AgreementLifecycleError, AgreementLifecycleResult,
    AgreementLifecycleService, CreateAgreementRequest,
};
