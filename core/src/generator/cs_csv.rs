use super::{
    encode_output, fetch_payment_invoices, persist_files, validate_payment_invoices, GenerationContext,
    GenerationReport, PaymentRequest, PaymentRequestGenerator, RequestDates,
    FILE_NAME_DATE_FORMAT,
};
use crate::{
    amount::is_negative,
    clock::jst_yyyymmdd,
    entities::{
        BillItem, InvoiceAdjustment, PartnerConvenienceStore, StudentBillingDetails,
    },
    error::{During, GenError, GenResult},
    format::{
        cs_csv::{prefecture_name, CsCsvFormatter},
        CsPaymentData, FieldNormalizer,
    },
    planner::{plan_files, PaymentFileAssoc},
    store::PaymentStore,
    types::{EntityId, FileFormat},
    validator::{LengthCeilings, PaymentRequestValidator},
};
use std::collections::HashMap;

/// Convenience-store CSV generator.
pub struct CsCsvGenerator<'a> {
    ctx: GenerationContext<'a>,
    request: PaymentRequest,
    validator: PaymentRequestValidator,
    partner: Option<PartnerConvenienceStore>,
    prefectures: HashMap<String, String>,
    records: Vec<CsPaymentData>,
    skipped_negative: usize,
}

impl<'a> CsCsvGenerator<'a> {
    pub fn new(ctx: GenerationContext<'a>, request: PaymentRequest) -> Self {
        Self {
            validator: PaymentRequestValidator::new(ctx.config.flags.optional_street_validation),
            ctx,
            request,
            partner: None,
            prefectures: HashMap::new(),
            records: Vec::new(),
            skipped_negative: 0,
        }
    }

    fn load_partner(&self) -> GenResult<PartnerConvenienceStore> {
        let partner = self
            .ctx
            .store
            .find_partner_convenience_store()
            .during("find partner convenience store")?
            .ok_or_else(|| GenError::validation("Partner has no associated convenience store"))?;
        self.validator.validate_partner_convenience_store(&partner)?;
        Ok(partner)
    }

    fn load_prefectures(&self) -> GenResult<HashMap<String, String>> {
        let prefectures = self
            .ctx
            .store
            .find_all_prefectures()
            .during("find all prefectures")?;
        if prefectures.is_empty() {
            return Err(GenError::validation("No prefecture records"));
        }
        let mut map = HashMap::new();
        for p in prefectures {
            map.entry(p.prefecture_code).or_insert(p.name);
        }
        Ok(map)
    }

    /// First billing record per student.
    fn billing_by_student(&self, student_ids: &[EntityId]) -> GenResult<HashMap<EntityId, StudentBillingDetails>> {
        let rows = self
            .ctx
            .store
            .find_student_billing_by_student_ids(student_ids)
            .during("find student billing details")?;
        let mut map = HashMap::new();
        for row in rows {
            map.entry(row.payment_detail.student_id.clone()).or_insert(row);
        }
        Ok(map)
    }

    fn bill_breakdown(
        &self,
        invoice_ids: &[EntityId],
    ) -> GenResult<(HashMap<EntityId, Vec<BillItem>>, HashMap<EntityId, Vec<InvoiceAdjustment>>)> {
        let mut items: HashMap<EntityId, Vec<BillItem>> = HashMap::new();
        let mut adjustments: HashMap<EntityId, Vec<InvoiceAdjustment>> = HashMap::new();
        if !self.ctx.config.flags.billing_message_in_csv {
            return Ok((items, adjustments));
        }
        let store = self.ctx.store;
        for item in store
            .find_bill_items_by_invoice_ids(invoice_ids)
            .during("find bill items")?
        {
            items.entry(item.invoice_id.clone()).or_default().push(item);
        }
        for adjustment in store
            .find_invoice_adjustments_by_invoice_ids(invoice_ids)
            .during("find invoice adjustments")?
        {
            adjustments
                .entry(adjustment.invoice_id.clone())
                .or_default()
                .push(adjustment);
        }
        Ok((items, adjustments))
    }

    fn formatter(&self) -> GenResult<CsCsvFormatter<'_>> {
        let partner = self
            .partner
            .as_ref()
            .ok_or_else(|| GenError::validation("Partner has no associated convenience store"))?;
        let flags = &self.ctx.config.flags;
        Ok(CsCsvFormatter {
            partner,
            prefectures: &self.prefectures,
            created_date: jst_yyyymmdd(self.ctx.clock.now_utc()),
            billing_message: flags.billing_message_in_csv,
            guardian_payer_name: flags.guardian_payer_name,
            normalizer: FieldNormalizer::new(flags.normalize_fields),
        })
    }

    fn base_file_name(&self) -> GenResult<String> {
        if self.ctx.config.flags.guardian_payer_name {
            return Ok(format!(
                "Payment_CS_created_date_{}",
                self.ctx.clock.today_jst().format(FILE_NAME_DATE_FORMAT)
            ));
        }
        match &self.request.dates {
            RequestDates::ConvenienceStore { due_from, due_until } => Ok(format!(
                "Payment_CS_{}to{}",
                due_from.format(FILE_NAME_DATE_FORMAT),
                due_until.format(FILE_NAME_DATE_FORMAT)
            )),
            RequestDates::DirectDebit { .. } => Err(GenError::validation(
                "Convenience store due dates are required",
            )),
        }
    }
}

impl<'a> PaymentRequestGenerator for CsCsvGenerator<'a> {
    type Record = CsPaymentData;

    fn format(&self) -> FileFormat {
        FileFormat::Csv
    }

    fn validate(&mut self) -> GenResult<()> {
        let partner = self.load_partner()?;
        let prefectures = self.load_prefectures()?;

        let payment_invoices = fetch_payment_invoices(self.ctx.store, &self.request.payment_ids)?;
        let student_ids = validate_payment_invoices(
            &self.validator,
            &payment_invoices,
            self.request.method,
            LengthCeilings::CSV,
        )?;
        let billing = self.billing_by_student(&student_ids)?;

        let invoice_ids: Vec<EntityId> = payment_invoices
            .iter()
            .map(|pi| pi.invoice.invoice_id.clone())
            .collect();
        let (mut items, mut adjustments) = self.bill_breakdown(&invoice_ids)?;

        let mut records = Vec::with_capacity(payment_invoices.len());
        let mut skipped = 0;
        for pi in payment_invoices {
            if is_negative(pi.invoice.total) {
                log::debug!("payment {} skipped: negative invoice total", pi.payment.payment_id);
                skipped += 1;
                continue;
            }

            let details = billing.get(&pi.payment.student_id).ok_or_else(|| {
                GenError::validation("There is a student that does not have billing details")
            })?;
            self.validator
                .validate_student_payment_detail(Some(&details.payment_detail))?;
            self.validator
                .validate_billing_address(details.billing_address.as_ref())?;
            let Some(billing_address) = details.billing_address.clone() else {
                return Err(GenError::validation("There is no billing address"));
            };
            prefecture_name(
                &prefectures,
                &details.payment_detail.student_id,
                &billing_address.prefecture_code,
            )?;
            let payment_detail = details.payment_detail.clone();

            let invoice_id = pi.invoice.invoice_id.clone();
            records.push(CsPaymentData {
                payment: pi.payment,
                invoice: pi.invoice,
                payment_detail,
                billing_address,
                bill_items: items.remove(&invoice_id).unwrap_or_default(),
                adjustments: adjustments.remove(&invoice_id).unwrap_or_default(),
            });
        }

        self.partner = Some(partner);
        self.prefectures = prefectures;
        self.records = records;
        self.skipped_negative = skipped;
        Ok(())
    }

    fn plan(&mut self) -> GenResult<Vec<PaymentFileAssoc<CsPaymentData>>> {
        let base_name = self.base_file_name()?;
        Ok(plan_files(
            std::mem::take(&mut self.records),
            self.ctx.config.limits.max_payments_per_csv,
            &base_name,
            FileFormat::Csv,
        ))
    }

    fn preflight(&self, file: &PaymentFileAssoc<CsPaymentData>) -> GenResult<()> {
        let content = self.formatter()?.render(&file.records)?;
        encode_output(self.ctx.config, content).map(drop)
    }

    fn render(
        &mut self,
        _store: &PaymentStore,
        file: &mut PaymentFileAssoc<CsPaymentData>,
    ) -> GenResult<Vec<u8>> {
        self.formatter()?.render(&file.records)
    }

    fn persist(&mut self, files: Vec<PaymentFileAssoc<CsPaymentData>>) -> GenResult<GenerationReport> {
        let ctx = self.ctx;
        let request = self.request.clone();
        let skipped = self.skipped_negative;
        let format = self.format();
        persist_files(ctx, &request, format, files, skipped, |store, file| {
            self.render(store, file)
        })
    }
}
