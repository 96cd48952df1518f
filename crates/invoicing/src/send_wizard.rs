use serde::{Deserialize, Serialize};
use tracing::debug;

use tallyworks_core::{DomainError, DomainResult};
use tallyworks_mail::{MailComposer, MailDispatcher, Recipient, TemplateCatalog, TemplateId};
use tallyworks_platform::{ensure_one_mut, ActionRegistry, RequestContext, UiAction};

use crate::invoice::{print_action, Invoice, InvoiceId, INVOICE_MODEL};

/// Dotted record-model key of the wizard itself.
pub const SEND_WIZARD_MODEL: &str = "invoicing.send_wizard";

/// Transient dialog for sending and/or printing a selection of invoices.
///
/// Lives for one user interaction: created from the triggering context,
/// edited through the onchange callbacks, consumed by [`send_and_print`]
/// (or one of its parts), then dropped. The composer is owned exclusively
/// by the wizard and goes away with it.
///
/// [`send_and_print`]: InvoiceSendWizard::send_and_print
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceSendWizard {
    is_email: bool,
    is_print: bool,
    printed: bool,
    invoice_ids: Vec<InvoiceId>,
    composer: MailComposer,
    template_id: Option<TemplateId>,
}

impl InvoiceSendWizard {
    /// Open the dialog for the context's active selection.
    ///
    /// Fails with `MissingContext` when the context carries no selection at
    /// all, and with `Validation` when it carries an empty one: there is
    /// nothing to compose a message for.
    pub fn from_context(ctx: &RequestContext) -> DomainResult<Self> {
        let active = ctx.require_active_ids()?;
        if active.is_empty() {
            return Err(DomainError::validation(
                "cannot open the send dialog for an empty invoice selection",
            ));
        }

        let invoice_ids: Vec<InvoiceId> = active.iter().copied().map(InvoiceId::new).collect();
        let composer = MailComposer::for_selection(invoice_ids.len());
        debug!(invoices = invoice_ids.len(), mode = ?composer.mode(), "send dialog opened");

        Ok(Self {
            is_email: ctx.company().invoice_is_email(),
            is_print: ctx.company().invoice_is_print(),
            printed: false,
            invoice_ids,
            composer,
            template_id: None,
        })
    }

    pub fn is_email(&self) -> bool {
        self.is_email
    }

    pub fn set_is_email(&mut self, is_email: bool) {
        self.is_email = is_email;
    }

    pub fn is_print(&self) -> bool {
        self.is_print
    }

    pub fn set_is_print(&mut self, is_print: bool) {
        self.is_print = is_print;
    }

    pub fn printed(&self) -> bool {
        self.printed
    }

    pub fn invoice_ids(&self) -> &[InvoiceId] {
        &self.invoice_ids
    }

    pub fn composer(&self) -> &MailComposer {
        &self.composer
    }

    pub fn template_id(&self) -> Option<TemplateId> {
        self.template_id
    }

    /// Edit the targeted invoices. The UI calls
    /// [`on_invoice_selection_change`](Self::on_invoice_selection_change)
    /// after every edit of this field.
    pub fn set_invoice_ids(&mut self, invoice_ids: Vec<InvoiceId>) {
        self.invoice_ids = invoice_ids;
    }

    /// Pick (or clear) the mail template. The UI calls
    /// [`on_template_change`](Self::on_template_change) afterwards.
    pub fn set_template(&mut self, template_id: Option<TemplateId>) {
        self.template_id = template_id;
    }

    /// Recompute the composer's mode after the invoice set changed. An
    /// in-flight empty selection composes as bulk; confirming it is still
    /// rejected by the terminal actions.
    pub fn on_invoice_selection_change(&mut self) {
        self.composer.recompute_mode(self.invoice_ids.len());
    }

    /// Propagate the chosen template into the composer and let it refresh
    /// its derived subject and body. Clearing the template clears the
    /// derived content too. Only invoice templates are accepted.
    pub fn on_template_change(&mut self, templates: &TemplateCatalog) -> DomainResult<()> {
        match self.template_id {
            Some(id) => {
                let template = templates.get(id)?;
                self.composer.apply_template(template, INVOICE_MODEL)
            }
            None => {
                self.composer.clear_template();
                Ok(())
            }
        }
    }

    /// Dispatch the composed message to every targeted invoice that has a
    /// partner address, if emailing is enabled. Returns the number of
    /// messages dispatched (0 when `is_email` is off).
    pub fn send_email(
        &self,
        dispatcher: &dyn MailDispatcher,
        invoices: &[Invoice],
    ) -> DomainResult<usize> {
        if !self.is_email {
            return Ok(0);
        }

        let recipients: Vec<Recipient> = invoices
            .iter()
            .filter(|invoice| self.invoice_ids.contains(&invoice.id_typed()))
            .filter_map(|invoice| {
                let email = invoice.partner_email()?;
                Some(Recipient {
                    record_id: invoice.id_typed().0,
                    email: email.to_string(),
                })
            })
            .collect();

        let skipped = self.invoice_ids.len().saturating_sub(recipients.len());
        if skipped > 0 {
            debug!(skipped, "invoices without a partner address were not emailed");
        }

        self.composer.send_mail(dispatcher, &recipients)
    }

    /// Print the targeted invoices. Requires exactly one wizard record in
    /// scope; the returned report action closes the dialog as soon as the
    /// download starts.
    pub fn print_document(
        wizards: &mut [InvoiceSendWizard],
        registry: &ActionRegistry,
    ) -> DomainResult<UiAction> {
        let wizard = ensure_one_mut(wizards, SEND_WIZARD_MODEL)?;
        let action = print_action(&wizard.invoice_ids, registry)?.close_on_download();
        wizard.printed = true;
        Ok(UiAction::Report(action))
    }

    /// The dialog's confirm button: always runs the email step (which
    /// itself honors `is_email`), then either returns the print action or
    /// plainly closes the dialog.
    pub fn send_and_print(
        wizards: &mut [InvoiceSendWizard],
        dispatcher: &dyn MailDispatcher,
        registry: &ActionRegistry,
        invoices: &[Invoice],
    ) -> DomainResult<UiAction> {
        {
            let wizard = ensure_one_mut(wizards, SEND_WIZARD_MODEL)?;
            wizard.send_email(dispatcher, invoices)?;
            if !wizard.is_print {
                return Ok(UiAction::CloseWindow);
            }
        }
        Self::print_document(wizards, registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::INVOICE_REPORT;
    use chrono::Utc;
    use std::cell::RefCell;
    use tallyworks_auth::User;
    use tallyworks_core::{CompanyId, RecordId, UserId};
    use tallyworks_mail::{CompositionMode, MailTemplate, OutboundMessage};
    use tallyworks_platform::{Company, ReportAction};

    #[derive(Default)]
    struct RecordingDispatcher {
        delivered: RefCell<Vec<OutboundMessage>>,
    }

    impl MailDispatcher for RecordingDispatcher {
        fn deliver(&self, message: OutboundMessage) -> DomainResult<()> {
            self.delivered.borrow_mut().push(message);
            Ok(())
        }
    }

    fn context_with(ids: Vec<RecordId>) -> RequestContext {
        let user = User::new(UserId::new(), []);
        let company = Company::new(CompanyId::new(), "Acme").with_invoice_defaults(true, false);
        RequestContext::new(user, company).with_active_ids(ids)
    }

    fn registry() -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        registry.register(
            INVOICE_REPORT,
            UiAction::Report(ReportAction::new(INVOICE_REPORT, vec![])),
        );
        registry
    }

    fn invoice(id: InvoiceId, email: Option<&str>) -> Invoice {
        Invoice::new(
            id,
            "INV/2019/0042",
            "Deco Addict",
            email.map(str::to_string),
            128_500,
            Utc::now(),
        )
    }

    fn invoice_template() -> MailTemplate {
        MailTemplate::new(
            TemplateId::new(RecordId::new()),
            INVOICE_MODEL,
            "Invoice: send by email",
            "Your invoice",
            "<p>Please find your invoice attached.</p>",
        )
    }

    #[test]
    fn from_context_takes_defaults_from_the_company() {
        let wizard = InvoiceSendWizard::from_context(&context_with(vec![RecordId::new()])).unwrap();
        assert!(wizard.is_email());
        assert!(!wizard.is_print());
        assert!(!wizard.printed());
        assert_eq!(wizard.invoice_ids().len(), 1);
        assert_eq!(wizard.composer().mode(), CompositionMode::Single);
    }

    #[test]
    fn from_context_uses_bulk_mode_for_multi_selections() {
        let ids = vec![RecordId::new(), RecordId::new(), RecordId::new()];
        let wizard = InvoiceSendWizard::from_context(&context_with(ids)).unwrap();
        assert_eq!(wizard.composer().mode(), CompositionMode::Bulk);
    }

    #[test]
    fn from_context_fails_without_a_selection() {
        let user = User::new(UserId::new(), []);
        let company = Company::new(CompanyId::new(), "Acme");
        let ctx = RequestContext::new(user, company);

        let err = InvoiceSendWizard::from_context(&ctx).unwrap_err();
        match err {
            DomainError::MissingContext(key) => assert_eq!(key, "active_ids"),
            _ => panic!("Expected MissingContext error"),
        }
    }

    #[test]
    fn from_context_rejects_an_empty_selection() {
        let err = InvoiceSendWizard::from_context(&context_with(vec![])).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn selection_change_recomputes_the_composer_mode() {
        let mut wizard =
            InvoiceSendWizard::from_context(&context_with(vec![RecordId::new()])).unwrap();
        assert_eq!(wizard.composer().mode(), CompositionMode::Single);

        wizard.set_invoice_ids(vec![
            InvoiceId::new(RecordId::new()),
            InvoiceId::new(RecordId::new()),
        ]);
        wizard.on_invoice_selection_change();
        assert_eq!(wizard.composer().mode(), CompositionMode::Bulk);

        wizard.set_invoice_ids(vec![]);
        wizard.on_invoice_selection_change();
        assert_eq!(wizard.composer().mode(), CompositionMode::Bulk);
    }

    #[test]
    fn template_change_refreshes_the_composer() {
        let mut wizard =
            InvoiceSendWizard::from_context(&context_with(vec![RecordId::new()])).unwrap();

        let template = invoice_template();
        let mut catalog = TemplateCatalog::new();
        catalog.insert(template.clone());

        wizard.set_template(Some(template.id()));
        wizard.on_template_change(&catalog).unwrap();
        assert_eq!(wizard.composer().subject(), "Your invoice");
        assert_eq!(wizard.composer().template_id(), Some(template.id()));

        wizard.set_template(None);
        wizard.on_template_change(&catalog).unwrap();
        assert_eq!(wizard.composer().subject(), "");
        assert_eq!(wizard.composer().template_id(), None);
    }

    #[test]
    fn template_change_rejects_non_invoice_templates() {
        let mut wizard =
            InvoiceSendWizard::from_context(&context_with(vec![RecordId::new()])).unwrap();

        let template = MailTemplate::new(
            TemplateId::new(RecordId::new()),
            "sales.order",
            "Order: confirmation",
            "Your order",
            "<p>Thanks.</p>",
        );
        let mut catalog = TemplateCatalog::new();
        catalog.insert(template.clone());

        wizard.set_template(Some(template.id()));
        let err = wizard.on_template_change(&catalog).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn send_email_is_a_noop_when_emailing_is_off() {
        let id = RecordId::new();
        let mut wizard = InvoiceSendWizard::from_context(&context_with(vec![id])).unwrap();
        wizard.set_is_email(false);

        let dispatcher = RecordingDispatcher::default();
        let invoices = [invoice(InvoiceId::new(id), Some("deco@example.com"))];
        assert_eq!(wizard.send_email(&dispatcher, &invoices).unwrap(), 0);
        assert!(dispatcher.delivered.borrow().is_empty());
    }

    #[test]
    fn send_email_targets_only_selected_invoices_with_an_address() {
        let selected = RecordId::new();
        let unselected = RecordId::new();
        let wizard = InvoiceSendWizard::from_context(&context_with(vec![selected])).unwrap();

        let dispatcher = RecordingDispatcher::default();
        let invoices = [
            invoice(InvoiceId::new(selected), Some("deco@example.com")),
            invoice(InvoiceId::new(unselected), Some("other@example.com")),
        ];

        assert_eq!(wizard.send_email(&dispatcher, &invoices).unwrap(), 1);
        let delivered = dispatcher.delivered.borrow();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].recipient.record_id, selected);
    }

    #[test]
    fn send_email_skips_invoices_without_an_address() {
        let id = RecordId::new();
        let wizard = InvoiceSendWizard::from_context(&context_with(vec![id])).unwrap();

        let dispatcher = RecordingDispatcher::default();
        let invoices = [invoice(InvoiceId::new(id), None)];
        assert_eq!(wizard.send_email(&dispatcher, &invoices).unwrap(), 0);
    }

    #[test]
    fn print_document_requires_exactly_one_wizard() {
        let registry = registry();

        let mut none: Vec<InvoiceSendWizard> = vec![];
        match InvoiceSendWizard::print_document(&mut none, &registry).unwrap_err() {
            DomainError::Precondition(_) => {}
            _ => panic!("Expected Precondition error"),
        }

        let wizard = InvoiceSendWizard::from_context(&context_with(vec![RecordId::new()])).unwrap();
        let mut two = vec![wizard.clone(), wizard];
        match InvoiceSendWizard::print_document(&mut two, &registry).unwrap_err() {
            DomainError::Precondition(_) => {}
            _ => panic!("Expected Precondition error"),
        }
    }

    #[test]
    fn print_document_returns_the_annotated_report_action() {
        let id = RecordId::new();
        let mut wizards =
            vec![InvoiceSendWizard::from_context(&context_with(vec![id])).unwrap()];

        let action = InvoiceSendWizard::print_document(&mut wizards, &registry()).unwrap();
        match action {
            UiAction::Report(report) => {
                assert_eq!(report.report, INVOICE_REPORT);
                assert_eq!(report.record_ids, vec![id]);
                assert!(report.close_on_report_download);
            }
            _ => panic!("Expected a report action"),
        }
        assert!(wizards[0].printed());
    }

    #[test]
    fn send_and_print_with_both_toggles_off_just_closes() {
        let id = RecordId::new();
        let mut wizards =
            vec![InvoiceSendWizard::from_context(&context_with(vec![id])).unwrap()];
        wizards[0].set_is_email(false);
        wizards[0].set_is_print(false);

        let dispatcher = RecordingDispatcher::default();
        let invoices = [invoice(InvoiceId::new(id), Some("deco@example.com"))];

        let action =
            InvoiceSendWizard::send_and_print(&mut wizards, &dispatcher, &registry(), &invoices)
                .unwrap();
        assert_eq!(action, UiAction::CloseWindow);
        assert!(dispatcher.delivered.borrow().is_empty());
        assert!(!wizards[0].printed());
    }

    #[test]
    fn send_and_print_emails_then_prints_when_both_are_on() {
        let id = RecordId::new();
        let mut wizards =
            vec![InvoiceSendWizard::from_context(&context_with(vec![id])).unwrap()];
        wizards[0].set_is_email(true);
        wizards[0].set_is_print(true);

        let dispatcher = RecordingDispatcher::default();
        let invoices = [invoice(InvoiceId::new(id), Some("deco@example.com"))];

        let action =
            InvoiceSendWizard::send_and_print(&mut wizards, &dispatcher, &registry(), &invoices)
                .unwrap();
        assert_eq!(dispatcher.delivered.borrow().len(), 1);
        match action {
            UiAction::Report(report) => assert!(report.close_on_report_download),
            _ => panic!("Expected a report action"),
        }
        assert!(wizards[0].printed());
    }

    #[test]
    fn send_and_print_requires_exactly_one_wizard() {
        let dispatcher = RecordingDispatcher::default();
        let mut none: Vec<InvoiceSendWizard> = vec![];
        let err =
            InvoiceSendWizard::send_and_print(&mut none, &dispatcher, &registry(), &[])
                .unwrap_err();
        match err {
            DomainError::Precondition(_) => {}
            _ => panic!("Expected Precondition error"),
        }
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: composition mode is `Single` for exactly one
            /// targeted invoice and `Bulk` otherwise.
            #[test]
            fn mode_follows_the_selection_size(len in 0usize..32) {
                let mut wizard = InvoiceSendWizard::from_context(
                    &context_with(vec![RecordId::new()]),
                ).unwrap();

                wizard.set_invoice_ids(
                    (0..len).map(|_| InvoiceId::new(RecordId::new())).collect(),
                );
                wizard.on_invoice_selection_change();

                let expected = if len == 1 {
                    CompositionMode::Single
                } else {
                    CompositionMode::Bulk
                };
                prop_assert_eq!(wizard.composer().mode(), expected);
            }
        }
    }
}
