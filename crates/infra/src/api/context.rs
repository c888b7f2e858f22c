//! Per-request identity and cancellation
//!
//! The web tier builds one [`RequestContext`] per inbound request and passes
//! it to every outbound API call made while serving that request.

use tokio_util::sync::CancellationToken;

/// The signed-in identity on whose behalf API calls are made
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    /// Stable object identifier issued by the identity provider
    pub user_id: String,
    /// Directory tenant the user signed in through
    pub tenant_id: Option<String>,
    /// Human-readable name, for logs only
    pub display_name: Option<String>,
}

impl Principal {
    /// Principal with no tenant or display name
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), tenant_id: None, display_name: None }
    }

    /// Set the tenant
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set the display name
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Identity plus the cancellation signal tied to the inbound request
#[derive(Debug, Clone)]
pub struct RequestContext {
    principal: Principal,
    cancellation: CancellationToken,
}

impl RequestContext {
    /// Context with its own, not yet cancelled, token
    #[must_use]
    pub fn new(principal: Principal) -> Self {
        Self::with_cancellation(principal, CancellationToken::new())
    }

    /// Context bound to an existing token, usually the inbound request's
    #[must_use]
    pub const fn with_cancellation(principal: Principal, cancellation: CancellationToken) -> Self {
        Self { principal, cancellation }
    }

    /// Context for a sub-operation; cancelled whenever `self` is cancelled
    #[must_use]
    pub fn child(&self) -> Self {
        Self { principal: self.principal.clone(), cancellation: self.cancellation.child_token() }
    }

    /// Identity the calls act for
    #[must_use]
    pub const fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Token observed by the pipeline
    #[must_use]
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Abort every call made with this context or its children
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Whether [`RequestContext::cancel`] was called here or on a parent
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
