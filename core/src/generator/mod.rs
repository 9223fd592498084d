//! Payment request generation: validate → plan → preflight → persist → upload.
//!
//! RULE: Every planned file renders and encodes cleanly before the first
//! transaction opens, so a bad record in a later file persists nothing.
//! RULE: Files are processed one at a time, in plan order.
//! RULE: Each file's rows commit in one transaction; the upload runs
//! after the commit and its failure is handled by `UploadFailurePolicy`.

mod cs_csv;
mod dd_txt;

pub use cs_csv::CsCsvGenerator;
pub use dd_txt::DdTxtGenerator;

use crate::{
    clock::Clock,
    config::{GeneratorConfig, UploadFailurePolicy},
    entities::PaymentInvoice,
    error::{During, GenError, GenResult},
    format::PaymentRecord,
    persistence::PersistenceGateway,
    planner::PaymentFileAssoc,
    storage::{ObjectStorage, ObjectUploader},
    store::PaymentStore,
    text::encode_shift_jis,
    types::{EntityId, FileFormat, PaymentMethod, RequestId},
    validator::{LengthCeilings, PaymentRequestValidator},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// `YYYYMMDD`, used in every generated file name.
pub const FILE_NAME_DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestDates {
    ConvenienceStore { due_from: NaiveDate, due_until: NaiveDate },
    DirectDebit { due_date: NaiveDate },
}

/// One caller request: which payments to export and how.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub bulk_payment_request_id: RequestId,
    pub payment_ids: Vec<EntityId>,
    pub method: PaymentMethod,
    pub dates: RequestDates,
}

/// Collaborators shared by every generator of one run.
#[derive(Clone, Copy)]
pub struct GenerationContext<'a> {
    pub store: &'a PaymentStore,
    pub storage: &'a dyn ObjectStorage,
    pub config: &'a GeneratorConfig,
    pub clock: &'a dyn Clock,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    pub file_id: EntityId,
    pub file_name: String,
    pub object_name: String,
    pub download_url: String,
    pub file_sequence_number: i64,
    pub total_file_count: i64,
    pub payment_count: usize,
    pub uploaded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub bulk_payment_request_id: RequestId,
    pub method: PaymentMethod,
    pub files: Vec<GeneratedFile>,
    /// Payments left out because their invoice total is negative.
    pub skipped_negative: usize,
}

impl GenerationReport {
    pub fn all_uploaded(&self) -> bool {
        self.files.iter().all(|f| f.uploaded)
    }
}

/// One output format. `generate` drives the four steps in order.
pub trait PaymentRequestGenerator {
    type Record: PaymentRecord;

    fn format(&self) -> FileFormat;

    /// Fetch and check everything the files will print.
    fn validate(&mut self) -> GenResult<()>;

    /// Split validated records into files.
    fn plan(&mut self) -> GenResult<Vec<PaymentFileAssoc<Self::Record>>>;

    /// Render and encode one file without touching the store.
    fn preflight(&self, file: &PaymentFileAssoc<Self::Record>) -> GenResult<()>;

    /// Bytes of one file. Runs inside that file's transaction.
    fn render(
        &mut self,
        store: &PaymentStore,
        file: &mut PaymentFileAssoc<Self::Record>,
    ) -> GenResult<Vec<u8>>;

    /// Commit and upload every planned file.
    fn persist(&mut self, files: Vec<PaymentFileAssoc<Self::Record>>) -> GenResult<GenerationReport>;

    fn generate(&mut self) -> GenResult<GenerationReport> {
        self.validate()?;
        let files = self.plan()?;
        for file in &files {
            self.preflight(file)?;
        }
        self.persist(files)
    }
}

/// Build the generator for `request.method` and run it.
pub fn generate_payment_request(
    ctx: GenerationContext<'_>,
    request: PaymentRequest,
) -> GenResult<GenerationReport> {
    log::info!(
        "generating {} files for request {} ({} payments)",
        request.method,
        request.bulk_payment_request_id,
        request.payment_ids.len()
    );
    let report = match request.method {
        PaymentMethod::ConvenienceStore => CsCsvGenerator::new(ctx, request).generate()?,
        PaymentMethod::DirectDebit => DdTxtGenerator::new(ctx, request).generate()?,
    };
    log::info!(
        "request {} done: {} file(s), {} skipped for negative totals",
        report.bulk_payment_request_id,
        report.files.len(),
        report.skipped_negative
    );
    Ok(report)
}

// ── Shared steps ───────────────────────────────────────────────

/// Check every payment/invoice pair and return the distinct student ids
/// in first-seen order.
pub(crate) fn validate_payment_invoices(
    validator: &PaymentRequestValidator,
    payment_invoices: &[PaymentInvoice],
    method: PaymentMethod,
    ceilings: LengthCeilings,
) -> GenResult<Vec<EntityId>> {
    let mut seen = HashSet::new();
    let mut student_ids = Vec::new();
    for pi in payment_invoices {
        validator.validate_payment(&pi.payment, method, false, ceilings)?;
        validator.validate_invoice(&pi.invoice, false, ceilings)?;
        if seen.insert(pi.payment.student_id.clone()) {
            student_ids.push(pi.payment.student_id.clone());
        }
    }
    Ok(student_ids)
}

pub(crate) fn fetch_payment_invoices(
    store: &PaymentStore,
    payment_ids: &[EntityId],
) -> GenResult<Vec<PaymentInvoice>> {
    let found = store
        .find_payment_invoice_by_ids(payment_ids)
        .during("find payment invoices")?;
    if found.is_empty() {
        return Err(GenError::validation("There are no payments to export"));
    }
    Ok(found)
}

/// File bytes as written: Shift-JIS when the flag is on, UTF-8 otherwise.
pub(crate) fn encode_output(config: &GeneratorConfig, content: Vec<u8>) -> GenResult<Vec<u8>> {
    if config.flags.encode_shift_jis {
        encode_shift_jis(&content)
    } else {
        Ok(content)
    }
}

/// Per file: render, encode, stage, record, commit; then upload.
pub(crate) fn persist_files<T, R>(
    ctx: GenerationContext<'_>,
    request: &PaymentRequest,
    format: FileFormat,
    files: Vec<PaymentFileAssoc<T>>,
    skipped_negative: usize,
    mut render: R,
) -> GenResult<GenerationReport>
where
    T: PaymentRecord,
    R: FnMut(&PaymentStore, &mut PaymentFileAssoc<T>) -> GenResult<Vec<u8>>,
{
    let gateway = PersistenceGateway;
    let request_id = &request.bulk_payment_request_id;
    let mut report = GenerationReport {
        bulk_payment_request_id: request_id.clone(),
        method: request.method,
        files: Vec::with_capacity(files.len()),
        skipped_negative,
    };

    for mut file in files {
        let uploader = ctx.store.with_transaction(|store| {
            let content = encode_output(ctx.config, render(store, &mut file)?)?;
            let uploader = ObjectUploader::new(
                ctx.storage,
                ctx.config.temp_dir.as_deref(),
                &format!("{request_id}-{}", file.file_name),
                &content,
                format.content_type(),
            )
            .during("stage payment file")?;
            gateway.record_file(store, request_id, &uploader.download_url(), &file)?;
            Ok(uploader)
        })?;

        log::info!(
            "committed {} ({} of {}, {} payments)",
            file.file_name,
            file.sequence_number,
            file.total_file_count,
            file.records.len()
        );

        let object_name = uploader.formatted_object_name().to_string();
        let download_url = uploader.download_url();
        let upload = uploader.upload().during("upload payment file");
        if let Err(e) = uploader.close() {
            log::warn!("could not remove temp file for {object_name}: {e}");
        }

        let uploaded = match upload {
            Ok(()) => true,
            Err(e) => match ctx.config.upload_failure_policy {
                UploadFailurePolicy::BestEffort => {
                    log::warn!("upload of {object_name} failed, file row kept: {e}");
                    false
                }
                UploadFailurePolicy::Abort => return Err(e),
            },
        };

        report.files.push(GeneratedFile {
            file_id: file.file_id,
            file_name: file.file_name,
            object_name,
            download_url,
            file_sequence_number: file.sequence_number,
            total_file_count: file.total_file_count,
            payment_count: file.records.len(),
            uploaded,
        });
    }

    Ok(report)
}
