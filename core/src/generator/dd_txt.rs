use super::{
    encode_output, fetch_payment_invoices, persist_files, validate_payment_invoices, GenerationContext,
    GenerationReport, PaymentRequest, PaymentRequestGenerator, RequestDates,
    FILE_NAME_DATE_FORMAT,
};
use crate::{
    amount::is_negative,
    bank_relation::BankRelationResolver,
    customer_code::{CustomerCodeAssigner, EXISTING_CUSTOMER},
    entities::{BankAccount, BankRelationMap, NewCustomerCodeHistory, StudentPaymentDetail},
    error::{During, GenError, GenResult},
    format::{dd_txt::DdTxtFormatter, DdPaymentData},
    planner::{plan_files, PaymentFileAssoc},
    store::PaymentStore,
    types::{EntityId, FileFormat},
    validator::{LengthCeilings, PaymentRequestValidator},
};
use std::collections::{BTreeMap, HashMap};

/// Records bound for one partner bank, and that bank's record limit.
#[derive(Debug, Default)]
struct BankGroup {
    records: Vec<DdPaymentData>,
    record_limit: i64,
}

/// Direct-debit TXT generator. One batch of files per partner bank.
pub struct DdTxtGenerator<'a> {
    ctx: GenerationContext<'a>,
    request: PaymentRequest,
    validator: PaymentRequestValidator,
    groups: BTreeMap<String, BankGroup>,
    assigner: CustomerCodeAssigner,
    formatter: DdTxtFormatter,
    skipped_negative: usize,
}

impl<'a> DdTxtGenerator<'a> {
    pub fn new(ctx: GenerationContext<'a>, request: PaymentRequest) -> Self {
        Self {
            validator: PaymentRequestValidator::new(ctx.config.flags.optional_street_validation),
            formatter: DdTxtFormatter::new(ctx.config.flags.normalize_fields),
            ctx,
            request,
            groups: BTreeMap::new(),
            assigner: CustomerCodeAssigner::default(),
            skipped_negative: 0,
        }
    }

    /// First payment detail that has a bank account, per student.
    fn bank_details_by_student(
        &self,
        student_ids: &[EntityId],
    ) -> GenResult<HashMap<EntityId, (StudentPaymentDetail, BankAccount)>> {
        let rows = self
            .ctx
            .store
            .find_student_bank_details_by_student_ids(student_ids)
            .during("find student bank details")?;
        let mut map = HashMap::new();
        for row in rows {
            if let Some(account) = row.bank_account {
                map.entry(row.payment_detail.student_id.clone())
                    .or_insert((row.payment_detail, account));
            }
        }
        Ok(map)
    }

    fn related_banks(
        &self,
        accounts: &HashMap<EntityId, (StudentPaymentDetail, BankAccount)>,
    ) -> GenResult<HashMap<EntityId, BankRelationMap>> {
        let mut branch_ids: Vec<EntityId> = accounts
            .values()
            .map(|(_, account)| account.bank_branch_id.clone())
            .collect();
        branch_ids.sort();
        branch_ids.dedup();
        let rows = self
            .ctx
            .store
            .find_related_bank_of_bank_branches(&branch_ids)
            .during("find related banks of bank branches")?;
        Ok(BankRelationResolver.resolve(rows))
    }

    fn due_date_label(&self) -> GenResult<String> {
        match &self.request.dates {
            RequestDates::DirectDebit { due_date } => {
                Ok(due_date.format(FILE_NAME_DATE_FORMAT).to_string())
            }
            RequestDates::ConvenienceStore { .. } => {
                Err(GenError::validation("Direct debit due date is required"))
            }
        }
    }

    fn max_per_file(&self, group: &BankGroup) -> i64 {
        if self.ctx.config.flags.partner_bank_record_limit {
            group.record_limit
        } else {
            self.ctx.config.limits.max_payments_per_txt
        }
    }
}

impl<'a> PaymentRequestGenerator for DdTxtGenerator<'a> {
    type Record = DdPaymentData;

    fn format(&self) -> FileFormat {
        FileFormat::Txt
    }

    fn validate(&mut self) -> GenResult<()> {
        let payment_invoices = fetch_payment_invoices(self.ctx.store, &self.request.payment_ids)?;
        let student_ids = validate_payment_invoices(
            &self.validator,
            &payment_invoices,
            self.request.method,
            LengthCeilings::TXT,
        )?;

        let accounts = self.bank_details_by_student(&student_ids)?;
        let related = self.related_banks(&accounts)?;

        let mut account_numbers: Vec<String> = accounts
            .values()
            .map(|(_, account)| account.bank_account_number.clone())
            .collect();
        account_numbers.sort();
        account_numbers.dedup();
        let assigner = CustomerCodeAssigner::load(self.ctx.store, &account_numbers)?;

        let mut groups: BTreeMap<String, BankGroup> = BTreeMap::new();
        let mut skipped = 0;
        for pi in payment_invoices {
            if is_negative(pi.invoice.total) {
                log::debug!("payment {} skipped: negative invoice total", pi.payment.payment_id);
                skipped += 1;
                continue;
            }

            let (detail, account) = accounts.get(&pi.payment.student_id).ok_or_else(|| {
                GenError::validation("There is a student that do not have bank account")
            })?;
            let relation = related
                .get(&account.bank_branch_id)
                .ok_or_else(|| GenError::validation("Student bank has no related bank"))?;

            self.validator.validate_student_payment_detail(Some(detail))?;
            self.validator.validate_bank_account(Some(account))?;
            self.validator.validate_bank_branch(Some(&relation.bank_branch))?;
            self.validator.validate_bank(Some(&relation.bank))?;
            self.validator.validate_partner_bank(&relation.partner_bank)?;

            let group = groups
                .entry(relation.partner_bank.bank_name.clone())
                .or_default();
            group.record_limit = relation.partner_bank.record_limit;
            group.records.push(DdPaymentData {
                payment: pi.payment,
                invoice: pi.invoice,
                bank_account: account.clone(),
                related_bank: relation.clone(),
                customer_code: None,
            });
        }

        self.groups = groups;
        self.assigner = assigner;
        self.skipped_negative = skipped;
        Ok(())
    }

    fn plan(&mut self) -> GenResult<Vec<PaymentFileAssoc<DdPaymentData>>> {
        let due = self.due_date_label()?;
        let mut files = Vec::new();
        for (bank_name, group) in std::mem::take(&mut self.groups) {
            let max = self.max_per_file(&group);
            files.extend(plan_files(
                group.records,
                max,
                &format!("Payment_DD_{due}_{bank_name}"),
                FileFormat::Txt,
            ));
        }
        Ok(files)
    }

    /// Codes are not issued yet; a placeholder of the same width stands in.
    fn preflight(&self, file: &PaymentFileAssoc<DdPaymentData>) -> GenResult<()> {
        let records: Vec<DdPaymentData> = file
            .records
            .iter()
            .cloned()
            .map(|mut record| {
                if record.customer_code.is_none() {
                    record.customer_code = Some(NewCustomerCodeHistory {
                        new_customer_code_history_id: String::new(),
                        student_id: record.payment.student_id.clone(),
                        bank_account_number: record.bank_account.bank_account_number.clone(),
                        new_customer_code: EXISTING_CUSTOMER.to_string(),
                    });
                }
                record
            })
            .collect();
        let content = self.formatter.render(&records)?;
        encode_output(self.ctx.config, content).map(drop)
    }

    fn render(
        &mut self,
        store: &PaymentStore,
        file: &mut PaymentFileAssoc<DdPaymentData>,
    ) -> GenResult<Vec<u8>> {
        for record in &mut file.records {
            let code = self.assigner.upsert(
                store,
                &record.payment.student_id,
                &record.bank_account.bank_account_number,
            )?;
            record.customer_code = Some(code);
        }
        self.formatter.render(&file.records)
    }

    fn persist(&mut self, files: Vec<PaymentFileAssoc<DdPaymentData>>) -> GenResult<GenerationReport> {
        let ctx = self.ctx;
        let request = self.request.clone();
        let skipped = self.skipped_negative;
        let format = self.format();
        persist_files(ctx, &request, format, files, skipped, |store, file| {
            self.render(store, file)
        })
    }
}
