//! Rule-based field extractors for Brazilian payslips.

pub mod amounts;
pub mod lines;
pub mod patterns;

pub use amounts::normalize_value;
pub use lines::{apply_label_lines, is_bare_label, split_label_value};
pub use patterns::*;

use regex::Regex;

use crate::error::{HoleriteError, Result};
use crate::models::config::FieldPattern;
use crate::models::record::{normalize_key, FieldRecord};

/// A dedicated field pattern.
///
/// Each named capture group of the pattern fills the field of the same
/// (normalized) name. Only the first match in the text is used.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pattern: Regex,
    numeric: bool,
}

impl FieldRule {
    /// Wrap an already compiled pattern.
    pub fn new(pattern: Regex) -> Self {
        Self {
            pattern,
            numeric: false,
        }
    }

    /// Compile `pattern` into a rule.
    ///
    /// Fails when the pattern is invalid or has no named capture group.
    pub fn compile(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| HoleriteError::Config(format!("invalid field pattern: {}", e)))?;

        if pattern.capture_names().flatten().next().is_none() {
            return Err(HoleriteError::Config(format!(
                "field pattern has no named capture group: {}",
                pattern.as_str()
            )));
        }

        Ok(Self::new(pattern))
    }

    /// Mark captured values as locale-formatted numbers.
    pub fn numeric(mut self, numeric: bool) -> Self {
        self.numeric = numeric;
        self
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric
    }

    /// Field keys this rule can fill.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.pattern.capture_names().flatten().map(normalize_key)
    }

    /// Apply the rule to `text`, keeping any value already in `record`.
    pub fn apply(&self, text: &str, record: &mut FieldRecord) {
        let Some(caps) = self.pattern.captures(text) else {
            return;
        };

        for name in self.pattern.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                let raw = m.as_str().trim();
                let value = if self.numeric {
                    normalize_value(raw)
                } else {
                    raw.to_string()
                };
                record.insert_first(normalize_key(name), &value);
            }
        }
    }
}

impl TryFrom<&FieldPattern> for FieldRule {
    type Error = HoleriteError;

    fn try_from(pattern: &FieldPattern) -> Result<Self> {
        Ok(FieldRule::compile(&pattern.pattern)?.numeric(pattern.numeric))
    }
}

/// Ordered catalog of dedicated field rules. Earlier rules win.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    rules: Vec<FieldRule>,
}

impl FieldCatalog {
    /// Catalog with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Built-in payslip catalog.
    pub fn holerite() -> Self {
        let text_rules = [
            &*NAME_LABEL,
            &*ID_NAME_HEADER,
            &*NAME_BEFORE_CPF,
            &*CPF,
            &*CNPJ,
            &*EMPLOYEE_ID,
            &*ROLE,
            &*FUNCTION,
            &*BANK,
            &*ADMISSION_DATE,
            &*REFERENCE_PERIOD,
            &*ACCOUNT,
        ];
        let numeric_rules = [
            &*TOTAL_EARNINGS,
            &*TOTAL_DEDUCTIONS,
            &*NET_PAY,
            &*SALARY_PAID,
            &*FGTS_BASE,
            &*FGTS_MONTH,
        ];

        let rules = text_rules
            .into_iter()
            .map(|re| FieldRule::new(re.clone()))
            .chain(
                numeric_rules
                    .into_iter()
                    .map(|re| FieldRule::new(re.clone()).numeric(true)),
            )
            .collect();

        Self { rules }
    }

    /// Append a rule with the lowest priority so far.
    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append rules compiled from configuration patterns.
    pub fn with_patterns(mut self, patterns: &[FieldPattern]) -> Result<Self> {
        for pattern in patterns {
            self.rules.push(FieldRule::try_from(pattern)?);
        }
        Ok(self)
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order.
    pub fn apply(&self, text: &str, record: &mut FieldRecord) {
        for rule in &self.rules {
            rule.apply(text, record);
        }
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::holerite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> FieldRecord {
        let mut record = FieldRecord::new();
        FieldCatalog::holerite().apply(text, &mut record);
        record
    }

    #[test]
    fn test_name_after_label() {
        let record = extract("Nome\nJOAO DA SILVA\nCPF: 123.456.789-00");
        assert_eq!(record.get("nome"), Some("JOAO DA SILVA"));
        assert_eq!(record.get("cpf"), Some("123.456.789-00"));
    }

    #[test]
    fn test_name_label_shapes() {
        assert_eq!(extract("Nome: ANA PAULA").get("nome"), Some("ANA PAULA"));
        assert_eq!(extract("Nome   JOAO DA SILVA").get("nome"), Some("JOAO DA SILVA"));
        assert_eq!(extract("NOME:\nRUI COSTA").get("nome"), Some("RUI COSTA"));
    }

    #[test]
    fn test_longer_label_starting_with_nome_is_not_a_name() {
        let record = extract("Nome da Empresa: ACME LTDA\nNome\nMARIA SOUZA");
        assert_eq!(record.get("nome"), Some("MARIA SOUZA"));

        let record = extract("Nome da Empresa: ACME LTDA");
        assert_eq!(record.get("nome"), None);
    }

    #[test]
    fn test_id_and_name_header() {
        let record = extract("0000012345 MARIA SOUZA LIMA  Banco 341 - ITAU\n");
        assert_eq!(record.get("matricula"), Some("0000012345"));
        assert_eq!(record.get("nome"), Some("MARIA SOUZA LIMA"));
        assert_eq!(record.get("banco"), Some("341 - ITAU"));
    }

    #[test]
    fn test_name_before_cpf() {
        let record = extract("Empresa Exemplo\nPEDRO ALVES\nCPF 987.654.321-00");
        assert_eq!(record.get("nome"), Some("PEDRO ALVES"));

        let record = extract("CPF 987.654.321-00");
        assert_eq!(record.get("nome"), None);
        assert_eq!(record.get("cpf"), Some("987.654.321-00"));
    }

    #[test]
    fn test_identifiers_and_dates() {
        let text = "CNPJ 12.345.678/0001-90\n\
                    Matrícula: 123456\n\
                    Cargo: AUXILIAR ADMINISTRATIVO\n\
                    Função OPERADOR\n\
                    Admitido em: 02/03/2019\n\
                    Referência 05/2024\n\
                    Ag/Conta: / 004512\n";
        let record = extract(text);

        assert_eq!(record.get("cnpj"), Some("12.345.678/0001-90"));
        assert_eq!(record.get("matricula"), Some("123456"));
        assert_eq!(record.get("cargo"), Some("AUXILIAR ADMINISTRATIVO"));
        assert_eq!(record.get("funcao"), Some("OPERADOR"));
        assert_eq!(record.get("admissao"), Some("02/03/2019"));
        assert_eq!(record.get("referencia"), Some("05/2024"));
        assert_eq!(record.get("conta"), Some("004512"));
    }

    #[test]
    fn test_numeric_fields_are_normalized() {
        let text = "TOTAL DE PROVENTOS 3.250,00\n\
                    Total de Descontos 412,35\n\
                    Líquido a Receber => 2.837,65\n\
                    Salário Pago: 2.837,65\n\
                    Base para FGTS 3.250,00\n\
                    FGTS do mês 260,00\n";
        let record = extract(text);

        assert_eq!(record.get("total_proventos"), Some("3250.00"));
        assert_eq!(record.get("total_descontos"), Some("412.35"));
        assert_eq!(record.get("liquido"), Some("2837.65"));
        assert_eq!(record.get("salario_pago"), Some("2837.65"));
        assert_eq!(record.get("base_fgts"), Some("3250.00"));
        assert_eq!(record.get("fgts_mes"), Some("260.00"));
    }

    #[test]
    fn test_compile_rejects_bad_patterns() {
        assert!(FieldRule::compile(r"Setor\s+(\w+)").is_err());
        assert!(FieldRule::compile(r"Setor\s+(?P<setor>\w+").is_err());

        let rule = FieldRule::compile(r"Setor\s+(?P<Setor>\w+)").unwrap();
        assert_eq!(rule.keys().collect::<Vec<_>>(), vec!["setor".to_string()]);
    }

    #[test]
    fn test_custom_patterns_run_after_builtin_rules() {
        let patterns = vec![
            FieldPattern {
                pattern: r"Cargo\s+(?P<cargo>\w+)".to_string(),
                numeric: false,
            },
            FieldPattern {
                pattern: r"Adicional\s+(?P<adicional>[\d.,]+)".to_string(),
                numeric: true,
            },
        ];
        let catalog = FieldCatalog::holerite().with_patterns(&patterns).unwrap();
        assert_eq!(catalog.len(), FieldCatalog::holerite().len() + 2);

        let mut record = FieldRecord::new();
        catalog.apply("Cargo GERENTE GERAL\nAdicional 1.100,50", &mut record);

        assert_eq!(record.get("cargo"), Some("GERENTE GERAL"));
        assert_eq!(record.get("adicional"), Some("1100.50"));
    }
}
