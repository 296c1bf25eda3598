//! Common regex patterns for Brazilian payslip extraction.
//!
//! Dedicated field patterns name their captures after the field key they
//! fill, so a single pattern can fill several keys.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Employee name after a "Nome" label ending in a colon, a line break,
    // or followed directly by an upper-case run
    pub static ref NAME_LABEL: Regex = Regex::new(
        r"(?i:\bnome\b)(?:[ \t]*:[ \t]*\n?[ \t]*|[ \t]*\n[ \t]*|[ \t]+)(?P<nome>[A-ZÇÀ-Ú][^\n]*)"
    ).unwrap();

    // "0000012345 JOAO DA SILVA Banco ..." header line
    pub static ref ID_NAME_HEADER: Regex = Regex::new(
        r"\b(?P<matricula>\d{10})\s+(?P<nome>[A-ZÇÀ-Ú ]{5,})\s+Banco"
    ).unwrap();

    // Upper-case name (two words or more) right before a CPF, same or
    // previous line
    pub static ref NAME_BEFORE_CPF: Regex = Regex::new(
        r"\b(?P<nome>[A-ZÇÀ-Ú]+(?:[ ]+[A-ZÇÀ-Ú]+)+?)[ \t]*\n?[ \t]*(?:CPF[ \t]*:?[ \t]*)?\d{3}\.\d{3}\.\d{3}-\d{2}\b"
    ).unwrap();

    // Tax ids
    pub static ref CPF: Regex = Regex::new(
        r"\b(?P<cpf>\d{3}\.\d{3}\.\d{3}-\d{2})\b"
    ).unwrap();

    pub static ref CNPJ: Regex = Regex::new(
        r"\b(?P<cnpj>\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2})\b"
    ).unwrap();

    // Employee id
    pub static ref EMPLOYEE_ID: Regex = Regex::new(
        r"(?i:matr[íi]cula)[ \t]*:?\s+(?P<matricula>\d{5,})"
    ).unwrap();

    // Role
    pub static ref ROLE: Regex = Regex::new(
        r"\bCargo\b[ \t]*:?[ \t]*(?P<cargo>\S[^\n]*)"
    ).unwrap();

    pub static ref FUNCTION: Regex = Regex::new(
        r"\bFun[cç][aã]o\b[ \t]*:?[ \t]*(?P<funcao>\w[\w ]*)"
    ).unwrap();

    // Bank
    pub static ref BANK: Regex = Regex::new(
        r"\bBanco\b[ \t]*:?[ \t]*(?P<banco>\S[^\n]*)"
    ).unwrap();

    pub static ref ACCOUNT: Regex = Regex::new(
        r"Ag/Conta:\s*/\s*(?P<conta>\d{4,})"
    ).unwrap();

    // Dates
    pub static ref ADMISSION_DATE: Regex = Regex::new(
        r"Admitido\s+em:?\s*(?P<admissao>\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref REFERENCE_PERIOD: Regex = Regex::new(
        r"Refer[êe]ncia:?\s+(?P<referencia>\d{2}/\d{4})"
    ).unwrap();

    // Totals (locale-formatted amounts)
    pub static ref TOTAL_EARNINGS: Regex = Regex::new(
        r"(?i:total\s+de\s+proventos)\s+(?P<total_proventos>[\d.,]+)"
    ).unwrap();

    pub static ref TOTAL_DEDUCTIONS: Regex = Regex::new(
        r"(?i:total\s+de\s+descontos)\s+(?P<total_descontos>[\d.,]+)"
    ).unwrap();

    pub static ref NET_PAY: Regex = Regex::new(
        r"(?i:l[ií]quido\s+a\s+receber)(?:\s*=>)?\s+(?P<liquido>[\d.,]+)"
    ).unwrap();

    pub static ref SALARY_PAID: Regex = Regex::new(
        r"Sal[aá]rio\s+Pago:?\s*(?P<salario_pago>[\d.]+,\d{2})"
    ).unwrap();

    pub static ref FGTS_BASE: Regex = Regex::new(
        r"Base\s+para\s+FGTS\s+(?P<base_fgts>[\d.,]+)"
    ).unwrap();

    pub static ref FGTS_MONTH: Regex = Regex::new(
        r"FGTS\s+do\s+m[eê]s\s+(?P<fgts_mes>[\d.,]+)"
    ).unwrap();

    // Generic "LABEL: VALUE" line
    pub static ref LABEL_VALUE_LINE: Regex = Regex::new(
        r"^(?P<label>[\p{L}\s/\-]{2,})[:\s]+(?P<value>.+)$"
    ).unwrap();

    // Line holding only a label
    pub static ref BARE_LABEL_LINE: Regex = Regex::new(
        r"^[\p{L}\s/\-]{3,}$"
    ).unwrap();

    // Line-item table header, cells may sit on separate lines
    pub static ref TABLE_HEADER: Regex = Regex::new(
        r"(?i)c[oó]digo\s+descri[cç][aã]o\s+valor"
    ).unwrap();

    // Earnings total line: everything after it is a deduction
    pub static ref EARNINGS_TOTAL_SENTINEL: Regex = Regex::new(
        r"(?i)\btotal\s+de\s+proventos\b"
    ).unwrap();

    // Line-item rows
    pub static ref ROW_THREE_COLUMN: Regex = Regex::new(
        r"^(?P<code>\d{2,5})\s+(?P<description>.+?)\s+(?P<value>[\d.,]+)$"
    ).unwrap();

    pub static ref ROW_FOUR_COLUMN: Regex = Regex::new(
        r"^(?P<code>\d{4})\s{2,}(?P<description>.+?)\s{2,}(?P<reference>[\d.,]{1,7})\s{2,}(?P<value>[\d.,]{1,10})$"
    ).unwrap();

    // Time-card records start with a date and a weekday token; cells may
    // be split across lines
    pub static ref TIMECARD_ROW_START: Regex = Regex::new(
        r"\b(?P<data>\d{2}/\d{2}/\d{4})\s+(?P<dia>\w{3}[-\w]*)\s+"
    ).unwrap();

    pub static ref TIMECARD_PUNCH: Regex = Regex::new(
        r"^\d{2}:\d{2}[rgc]?$"
    ).unwrap();

    pub static ref TIMECARD_EVENT_START: Regex = Regex::new(
        r"\d{2}:\d{2}\s+\d{3}\s"
    ).unwrap();

    pub static ref TIMECARD_EVENT: Regex = Regex::new(
        r"^(?P<tempo>\d{2}):(?P<minutos>\d{2})\s+(?P<codigo>\d{3})\s+(?P<descricao>.*)$"
    ).unwrap();
}
