//! Initial database migration.
//!
//! Creates the enums, tables, constraints and indexes of the reconciliation
//! engine.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: QUOTATIONS & INVOICES
        // ============================================================
        db.execute_unprepared(QUOTATIONS_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;

        // ============================================================
        // PART 3: TRANSACTIONS
        // ============================================================
        db.execute_unprepared(CUSTOMER_TRANSACTIONS_SQL).await?;
        db.execute_unprepared(WHOLESALE_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 4: ISSUED DOCUMENTS
        // ============================================================
        db.execute_unprepared(RECEIPTS_SQL).await?;
        db.execute_unprepared(CREDIT_NOTES_SQL).await?;

        // ============================================================
        // PART 5: NUMBER SEQUENCES
        // ============================================================
        db.execute_unprepared(DOCUMENT_SEQUENCES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE invoice_status AS ENUM ('issued', 'partial_paid', 'paid', 'cancelled', 'voided');
CREATE TYPE transaction_status AS ENUM ('pending', 'confirmed', 'cancelled');
CREATE TYPE transaction_kind AS ENUM ('payment', 'refund');
CREATE TYPE document_status AS ENUM ('issued', 'cancelled');
";

const QUOTATIONS_SQL: &str = r"
CREATE TABLE quotations (
    id                  UUID PRIMARY KEY,
    quotation_number    VARCHAR(32) NOT NULL,
    customer_name       VARCHAR(255) NOT NULL,
    total_amount        NUMERIC(19, 2) NOT NULL DEFAULT 0,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_quotations_number UNIQUE (quotation_number)
);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id                          UUID PRIMARY KEY,
    quotation_id                UUID NOT NULL REFERENCES quotations(id),
    invoice_number              VARCHAR(32) NOT NULL,
    grand_total                 NUMERIC(19, 2) NOT NULL,
    paid_amount                 NUMERIC(19, 2) NOT NULL DEFAULT 0,
    refunded_amount             NUMERIC(19, 2) NOT NULL DEFAULT 0,
    status                      invoice_status NOT NULL DEFAULT 'issued',
    has_tax_invoice             BOOLEAN NOT NULL DEFAULT FALSE,
    tax_invoice_number          VARCHAR(32),
    tax_invoice_issued_at       TIMESTAMPTZ,
    tax_invoice_cancelled_at    TIMESTAMPTZ,
    created_at                  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at                  TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_invoices_number UNIQUE (invoice_number),
    CONSTRAINT uq_invoices_tax_invoice_number UNIQUE (tax_invoice_number),
    CONSTRAINT chk_invoices_grand_total CHECK (grand_total > 0),
    CONSTRAINT chk_invoices_aggregates CHECK (paid_amount >= 0 AND refunded_amount >= 0),
    CONSTRAINT chk_invoices_net_paid CHECK (
        status IN ('cancelled', 'voided')
        OR (paid_amount - refunded_amount BETWEEN 0 AND grand_total)
    ),
    CONSTRAINT chk_invoices_tax_invoice CHECK (NOT has_tax_invoice OR tax_invoice_number IS NOT NULL)
);

CREATE INDEX idx_invoices_quotation ON invoices(quotation_id);
";

const CUSTOMER_TRANSACTIONS_SQL: &str = r"
CREATE TABLE customer_transactions (
    id                  UUID PRIMARY KEY,
    transaction_number  VARCHAR(32) NOT NULL,
    transaction_kind    transaction_kind NOT NULL,
    invoice_id          UUID NOT NULL REFERENCES invoices(id),
    quotation_id        UUID NOT NULL REFERENCES quotations(id),
    amount              NUMERIC(19, 2) NOT NULL,
    payment_method      VARCHAR(50) NOT NULL,
    payment_date        DATE NOT NULL,
    evidence_url        TEXT,
    gateway_reference   VARCHAR(255),
    refund_reason       TEXT,
    status              transaction_status NOT NULL DEFAULT 'pending',
    confirmed_by        UUID,
    confirmed_at        TIMESTAMPTZ,
    cancelled_by        UUID,
    cancelled_at        TIMESTAMPTZ,
    cancel_reason       TEXT,
    created_by          UUID,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_customer_transactions_number UNIQUE (transaction_number),
    CONSTRAINT chk_customer_transactions_amount CHECK (amount > 0),
    CONSTRAINT chk_customer_transactions_refund_reason CHECK (
        transaction_kind <> 'refund' OR refund_reason IS NOT NULL
    )
);

CREATE INDEX idx_customer_transactions_invoice ON customer_transactions(invoice_id, created_at);
CREATE INDEX idx_customer_transactions_pending ON customer_transactions(status) WHERE status = 'pending';
";

const WHOLESALE_TRANSACTIONS_SQL: &str = r"
CREATE TABLE wholesale_transactions (
    id                  UUID PRIMARY KEY,
    transaction_number  VARCHAR(32) NOT NULL,
    transaction_kind    transaction_kind NOT NULL,
    quotation_id        UUID NOT NULL REFERENCES quotations(id),
    wholesaler_name     VARCHAR(255) NOT NULL,
    amount              NUMERIC(19, 2) NOT NULL,
    payment_method      VARCHAR(50) NOT NULL,
    payment_date        DATE NOT NULL,
    evidence_url        TEXT,
    refund_reason       TEXT,
    status              transaction_status NOT NULL DEFAULT 'pending',
    confirmed_by        UUID,
    confirmed_at        TIMESTAMPTZ,
    cancelled_by        UUID,
    cancelled_at        TIMESTAMPTZ,
    cancel_reason       TEXT,
    created_by          UUID,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_wholesale_transactions_number UNIQUE (transaction_number),
    CONSTRAINT chk_wholesale_transactions_amount CHECK (amount > 0),
    CONSTRAINT chk_wholesale_transactions_refund_reason CHECK (
        transaction_kind <> 'refund' OR refund_reason IS NOT NULL
    )
);

CREATE INDEX idx_wholesale_transactions_quotation ON wholesale_transactions(quotation_id);
";

const RECEIPTS_SQL: &str = r"
CREATE TABLE receipts (
    id                  UUID PRIMARY KEY,
    document_number     VARCHAR(32) NOT NULL,
    transaction_id      UUID NOT NULL REFERENCES customer_transactions(id),
    invoice_id          UUID NOT NULL REFERENCES invoices(id),
    quotation_id        UUID NOT NULL REFERENCES quotations(id),
    amount              NUMERIC(19, 2) NOT NULL,
    status              document_status NOT NULL DEFAULT 'issued',
    issued_at           TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    cancelled_at        TIMESTAMPTZ,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_receipts_document_number UNIQUE (document_number)
);

-- At most one live receipt per transaction
CREATE UNIQUE INDEX uq_receipts_issued_per_transaction
    ON receipts(transaction_id) WHERE status = 'issued';
";

const CREDIT_NOTES_SQL: &str = r"
CREATE TABLE credit_notes (
    id                  UUID PRIMARY KEY,
    document_number     VARCHAR(32) NOT NULL,
    transaction_id      UUID NOT NULL REFERENCES customer_transactions(id),
    invoice_id          UUID NOT NULL REFERENCES invoices(id),
    quotation_id        UUID NOT NULL REFERENCES quotations(id),
    amount              NUMERIC(19, 2) NOT NULL,
    status              document_status NOT NULL DEFAULT 'issued',
    issued_at           TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    cancelled_at        TIMESTAMPTZ,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_credit_notes_document_number UNIQUE (document_number)
);

CREATE UNIQUE INDEX uq_credit_notes_issued_per_transaction
    ON credit_notes(transaction_id) WHERE status = 'issued';
";

const DOCUMENT_SEQUENCES_SQL: &str = r"
CREATE TABLE document_sequences (
    doc_type        VARCHAR(32) NOT NULL,
    period_year     INTEGER NOT NULL,
    period_month    INTEGER NOT NULL,
    last_value      INTEGER NOT NULL,
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    PRIMARY KEY (doc_type, period_year, period_month),
    CONSTRAINT chk_document_sequences_month CHECK (period_month BETWEEN 1 AND 12),
    CONSTRAINT chk_document_sequences_value CHECK (last_value > 0)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS document_sequences;
DROP TABLE IF EXISTS credit_notes;
DROP TABLE IF EXISTS receipts;
DROP TABLE IF EXISTS wholesale_transactions;
DROP TABLE IF EXISTS customer_transactions;
DROP TABLE IF EXISTS invoices;
DROP TABLE IF EXISTS quotations;
DROP TYPE IF EXISTS document_status;
DROP TYPE IF EXISTS transaction_kind;
DROP TYPE IF EXISTS transaction_status;
DROP TYPE IF EXISTS invoice_status;
";
