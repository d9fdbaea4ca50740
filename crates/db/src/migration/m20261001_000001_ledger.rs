//! Ledger schema migration.
//!
//! Creates the account directory, journal tables, and the triggers that keep
//! the journal balanced and append-only even for writes that bypass the service.

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
        // PART 2: TABLES
        // ============================================================
        db.execute_unprepared(LEDGER_ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRY_LINES_SQL).await?;

        // ============================================================
        // PART 3: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE ledger_account_type AS ENUM (
    'ASSET',
    'LIABILITY',
    'EQUITY',
    'INCOME',
    'EXPENSE'
);

CREATE TYPE journal_entry_type AS ENUM ('DEBIT', 'CREDIT');
";

const LEDGER_ACCOUNTS_SQL: &str = r"
CREATE TABLE ledger_accounts (
    id              UUID PRIMARY KEY,
    code            VARCHAR(32) NOT NULL,
    name            VARCHAR(255) NOT NULL,
    account_type    ledger_account_type NOT NULL,
    is_active       BOOLEAN NOT NULL DEFAULT TRUE,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_ledger_accounts_code UNIQUE (code),
    CONSTRAINT chk_ledger_accounts_code_not_blank CHECK (btrim(code) <> '')
);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id              UUID PRIMARY KEY,
    reference       VARCHAR(64) NOT NULL,
    description     VARCHAR(255) NOT NULL,
    value_date      DATE NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_journal_entries_reference UNIQUE (reference)
);

CREATE INDEX idx_journal_entries_value_date ON journal_entries(value_date);
";

const JOURNAL_ENTRY_LINES_SQL: &str = r"
CREATE TABLE journal_entry_lines (
    id                  UUID PRIMARY KEY,
    journal_entry_id    UUID NOT NULL REFERENCES journal_entries(id),
    line_no             INTEGER NOT NULL,
    ledger_account_id   UUID NOT NULL REFERENCES ledger_accounts(id),
    entry_type          journal_entry_type NOT NULL,
    amount              NUMERIC(21, 4) NOT NULL,

    CONSTRAINT chk_journal_entry_lines_amount_positive CHECK (amount > 0),
    CONSTRAINT uq_journal_entry_lines_line_no UNIQUE (journal_entry_id, line_no)
);

CREATE INDEX idx_journal_entry_lines_account ON journal_entry_lines(ledger_account_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: check_journal_entry_balance
-- Rejects, at commit, any entry whose debits differ from its credits
-- or that has fewer than two lines
-- ============================================================
CREATE OR REPLACE FUNCTION check_journal_entry_balance()
RETURNS TRIGGER AS $$
DECLARE
    total_debit NUMERIC(21, 4);
    total_credit NUMERIC(21, 4);
    line_count INTEGER;
BEGIN
    SELECT
        COALESCE(SUM(CASE WHEN entry_type = 'DEBIT' THEN amount END), 0),
        COALESCE(SUM(CASE WHEN entry_type = 'CREDIT' THEN amount END), 0),
        COUNT(*)
    INTO total_debit, total_credit, line_count
    FROM journal_entry_lines
    WHERE journal_entry_id = NEW.journal_entry_id;

    IF line_count < 2 THEN
        RAISE EXCEPTION 'Journal entry % has fewer than 2 lines', NEW.journal_entry_id;
    END IF;

    IF total_debit <> total_credit THEN
        RAISE EXCEPTION 'Journal entry is not balanced. Debit: %, Credit: %',
            total_debit, total_credit;
    END IF;

    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE CONSTRAINT TRIGGER trg_check_journal_entry_balance
AFTER INSERT ON journal_entry_lines
DEFERRABLE INITIALLY DEFERRED
FOR EACH ROW
EXECUTE FUNCTION check_journal_entry_balance();

-- ============================================================
-- FUNCTION: prevent_journal_modification
-- The journal is append-only; corrections are new offsetting entries
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_journal_modification()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'Journal data is append-only: % on % is not allowed',
        TG_OP, TG_TABLE_NAME;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_journal_entries_append_only
BEFORE UPDATE OR DELETE ON journal_entries
FOR EACH ROW
EXECUTE FUNCTION prevent_journal_modification();

CREATE TRIGGER trg_journal_entry_lines_append_only
BEFORE UPDATE OR DELETE ON journal_entry_lines
FOR EACH ROW
EXECUTE FUNCTION prevent_journal_modification();

-- ============================================================
-- FUNCTION: guard_ledger_account_change
-- Accounts are never deleted; code and type are frozen once lines reference them
-- ============================================================
CREATE OR REPLACE FUNCTION guard_ledger_account_change()
RETURNS TRIGGER AS $$
BEGIN
    IF TG_OP = 'DELETE' THEN
        RAISE EXCEPTION 'Ledger accounts cannot be deleted, deactivate % instead', OLD.code;
    END IF;

    IF (NEW.account_type <> OLD.account_type OR NEW.code <> OLD.code)
        AND EXISTS (
            SELECT 1 FROM journal_entry_lines WHERE ledger_account_id = OLD.id
        ) THEN
        RAISE EXCEPTION 'Ledger account % is referenced by journal lines and cannot change code or type',
            OLD.code;
    END IF;

    NEW.updated_at := NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_guard_ledger_account_change
BEFORE UPDATE OR DELETE ON ledger_accounts
FOR EACH ROW
EXECUTE FUNCTION guard_ledger_account_change();
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_guard_ledger_account_change ON ledger_accounts;
DROP TRIGGER IF EXISTS trg_journal_entry_lines_append_only ON journal_entry_lines;
DROP TRIGGER IF EXISTS trg_journal_entries_append_only ON journal_entries;
DROP TRIGGER IF EXISTS trg_check_journal_entry_balance ON journal_entry_lines;

DROP FUNCTION IF EXISTS guard_ledger_account_change();
DROP FUNCTION IF EXISTS prevent_journal_modification();
DROP FUNCTION IF EXISTS check_journal_entry_balance();

DROP TABLE IF EXISTS journal_entry_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS ledger_accounts CASCADE;

DROP TYPE IF EXISTS journal_entry_type;
DROP TYPE IF EXISTS ledger_account_type;
";
