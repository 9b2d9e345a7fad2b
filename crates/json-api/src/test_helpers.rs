//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use aldaba::lifecycle::{self, CodeStatus};
use aldaba_app::{
    auth::AdminToken,
    context::AppContext,
    domain::{
        access_codes::{MockAccessCodesService, data::NewQrCode, records::QrCodeRecord},
        documents::{
            MockDocumentsService,
            data::{NewIne, NewWorker},
            records::{DocumentStatus, IneRecord, WorkerRecord},
        },
        push_tokens::{
            MockPushTokensService,
            data::NewPushToken,
            records::{PushTokenRecord, PushTokenUpsert},
        },
        reports::MockReportsService,
    },
};

use crate::state::State;

fn strict_codes_mock() -> MockAccessCodesService {
    let mut codes = MockAccessCodesService::new();

    codes.expect_register().never();
    codes.expect_validate().never();
    codes.expect_history().never();
    codes.expect_daily_counters().never();
    codes.expect_reset().never();

    codes
}

fn strict_push_tokens_mock() -> MockPushTokensService {
    let mut push_tokens = MockPushTokensService::new();

    push_tokens.expect_upsert().never();
    push_tokens.expect_find().never();

    push_tokens
}

fn strict_documents_mock() -> MockDocumentsService {
    let mut documents = MockDocumentsService::new();

    documents.expect_register_worker().never();
    documents.expect_register_ine().never();
    documents.expect_list_ines().never();

    documents
}

fn strict_reports_mock() -> MockReportsService {
    let mut reports = MockReportsService::new();

    reports.expect_daily_activity().never();

    reports
}

fn app_context(
    codes: MockAccessCodesService,
    push_tokens: MockPushTokensService,
    documents: MockDocumentsService,
) -> AppContext {
    AppContext {
        access_codes: Arc::new(codes),
        push_tokens: Arc::new(push_tokens),
        documents: Arc::new(documents),
        reports: Arc::new(strict_reports_mock()),
        mail: None,
    }
}

pub(crate) fn state_with_nothing() -> Arc<State> {
    state_with_codes(strict_codes_mock())
}

pub(crate) fn state_with_codes(codes: MockAccessCodesService) -> Arc<State> {
    State::new(
        app_context(codes, strict_push_tokens_mock(), strict_documents_mock()),
        None,
    )
    .into_shared()
}

pub(crate) fn state_with_push_tokens(push_tokens: MockPushTokensService) -> Arc<State> {
    State::new(
        app_context(strict_codes_mock(), push_tokens, strict_documents_mock()),
        None,
    )
    .into_shared()
}

pub(crate) fn state_with_documents(documents: MockDocumentsService) -> Arc<State> {
    State::new(
        app_context(strict_codes_mock(), strict_push_tokens_mock(), documents),
        None,
    )
    .into_shared()
}

pub(crate) fn state_with_admin(codes: MockAccessCodesService, token: &str) -> Arc<State> {
    State::new(
        app_context(codes, strict_push_tokens_mock(), strict_documents_mock()),
        Some(AdminToken::new(token.to_string())),
    )
    .into_shared()
}

pub(crate) fn service(state: Arc<State>, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state)).push(route))
}

pub(crate) fn codes_service(codes: MockAccessCodesService, route: Router) -> Service {
    service(state_with_codes(codes), route)
}

pub(crate) fn push_tokens_service(push_tokens: MockPushTokensService, route: Router) -> Service {
    service(state_with_push_tokens(push_tokens), route)
}

pub(crate) fn documents_service(documents: MockDocumentsService, route: Router) -> Service {
    service(state_with_documents(documents), route)
}

pub(crate) fn make_code_record(new: NewQrCode) -> QrCodeRecord {
    let created_at = Timestamp::UNIX_EPOCH;

    QrCodeRecord {
        uuid: Uuid::nil(),
        code: lifecycle::compose_code(created_at, &new.house_number, "abc123"),
        house_number: new.house_number,
        condominium: new.condominium,
        visitor_name: new.visitor_name,
        resident_name: new.resident_name,
        created_at,
        expires_at: lifecycle::expiry(created_at),
        used_at: None,
        is_used: false,
        status: CodeStatus::Active,
    }
}

pub(crate) fn make_push_token_upsert(new: NewPushToken, inserted: bool) -> PushTokenUpsert {
    PushTokenUpsert {
        record: PushTokenRecord {
            uuid: Uuid::nil(),
            house_number: new.house_number,
            condominium: new.condominium,
            push_token: new.push_token,
            platform: new.platform,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        },
        inserted,
    }
}

pub(crate) fn make_worker_record(new: NewWorker) -> WorkerRecord {
    WorkerRecord {
        uuid: Uuid::nil(),
        house_number: new.house_number,
        condominium: new.condominium,
        name: new.name,
        worker_type: new.worker_type.unwrap_or_else(|| "general".to_string()),
        photo_file_id: None,
        status: DocumentStatus::Processing,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_ine_record(new: NewIne) -> IneRecord {
    IneRecord {
        uuid: Uuid::nil(),
        house_number: new.house_number,
        condominium: new.condominium,
        first_name: new.first_name,
        last_name: new.last_name,
        ine_number: new.ine_number,
        curp: new.curp,
        front_file_id: None,
        back_file_id: None,
        notes: new.notes,
        status: DocumentStatus::Processing,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
