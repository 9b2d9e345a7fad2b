//! State

use std::{sync::Arc, time::Instant};

use aldaba_app::{auth::AdminToken, context::AppContext};

pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) admin_token: Option<AdminToken>,
    pub(crate) started_at: Instant,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, admin_token: Option<AdminToken>) -> Self {
        Self {
            app,
            admin_token,
            started_at: Instant::now(),
        }
    }

    #[must_use]
    pub(crate) fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
