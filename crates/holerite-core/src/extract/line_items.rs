//! Earnings/deduction line-item extraction.

use regex::Captures;
use tracing::trace;

use crate::models::config::RowLayout;
use crate::models::payslip::{Category, LineItem};

use super::rules::{
    normalize_value, EARNINGS_TOTAL_SENTINEL, ROW_FOUR_COLUMN, ROW_THREE_COLUMN, TABLE_HEADER,
};

/// Category tracker for the lines of one page.
///
/// Starts on [`Category::Provento`] and moves to [`Category::Desconto`] on
/// the earnings total line. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CategoryMachine {
    state: Category,
}

impl CategoryMachine {
    fn new() -> Self {
        Self {
            state: Category::Provento,
        }
    }

    fn state(&self) -> Category {
        self.state
    }

    /// Feed one line. Returns true when the line is the earnings total.
    fn advance(&mut self, line: &str) -> bool {
        if EARNINGS_TOTAL_SENTINEL.is_match(line) {
            self.state = transition(self.state);
            true
        } else {
            false
        }
    }
}

fn transition(state: Category) -> Category {
    match state {
        Category::Provento | Category::Desconto => Category::Desconto,
    }
}

/// Where the scan is relative to the line-item tables of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    /// Page has no table header: every line is a candidate row.
    Free,
    /// Outside any table block.
    Idle,
    /// Inside a block; `started` once a row or any non-blank line was seen.
    Block { started: bool },
}

/// Extracts payslip line items from a page.
#[derive(Debug, Clone, Default)]
pub struct LineItemExtractor {
    layout: RowLayout,
}

impl LineItemExtractor {
    pub fn new(layout: RowLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> RowLayout {
        self.layout
    }

    /// Extract the line items of one page, tagging each with `owner`.
    ///
    /// When the page has table headers, only the contiguous rows right
    /// below each header are read; otherwise every matching line is. Lines
    /// that do not parse are skipped.
    pub fn extract(&self, text: &str, owner: &str) -> Vec<LineItem> {
        let mut headers = TABLE_HEADER.find_iter(text).map(|m| m.range()).peekable();
        let mut scan = if headers.peek().is_some() {
            Scan::Idle
        } else {
            Scan::Free
        };
        let mut machine = CategoryMachine::new();
        let mut items = Vec::new();

        let mut next_start = 0;
        'lines: for raw in text.split('\n') {
            let line_start = next_start;
            let line_end = line_start + raw.len();
            next_start = line_end + 1;

            let mut line = raw;
            while let Some(header) = headers.peek() {
                if header.start > line_end {
                    break;
                }
                if header.end > line_end {
                    // Header cells continue on the next line
                    continue 'lines;
                }
                line = &text[header.end.max(line_start)..line_end];
                scan = Scan::Block { started: false };
                headers.next();
            }

            let line = line.trim();

            if machine.advance(line) {
                if let Scan::Block { .. } = scan {
                    scan = Scan::Idle;
                }
                continue;
            }

            match scan {
                Scan::Free => {
                    if let Some(item) = self.parse_row(line, machine.state(), owner) {
                        items.push(item);
                    }
                }
                Scan::Idle => {}
                Scan::Block { started } => {
                    if line.is_empty() && !started {
                        continue;
                    }
                    match self.parse_row(line, machine.state(), owner) {
                        Some(item) => {
                            items.push(item);
                            scan = Scan::Block { started: true };
                        }
                        None => scan = Scan::Idle,
                    }
                }
            }
        }

        trace!("Extracted {} line items for {}", items.len(), owner);
        items
    }

    /// Parse one trimmed line with the configured row grammar.
    pub fn parse_row(&self, line: &str, category: Category, owner: &str) -> Option<LineItem> {
        match self.layout {
            RowLayout::ThreeColumn => {
                let caps = ROW_THREE_COLUMN.captures(line)?;
                Some(build_item(&caps, category, None, owner))
            }
            RowLayout::FourColumn => {
                let caps = ROW_FOUR_COLUMN.captures(line)?;
                let reference = caps.name("reference").map(|m| normalize_value(m.as_str()));
                Some(build_item(&caps, category, reference, owner))
            }
        }
    }
}

fn build_item(caps: &Captures<'_>, category: Category, reference: Option<String>, owner: &str) -> LineItem {
    LineItem {
        category,
        code: caps["code"].to_string(),
        description: caps["description"].trim().to_string(),
        reference,
        value: normalize_value(&caps["value"]),
        owner: owner.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary(items: &[LineItem]) -> Vec<(Category, &str, &str)> {
        items
            .iter()
            .map(|i| (i.category, i.code.as_str(), i.value.as_str()))
            .collect()
    }

    #[test]
    fn test_three_column_row() {
        let extractor = LineItemExtractor::new(RowLayout::ThreeColumn);
        let items = extractor.extract("1234  SALARIO BASE  1000,00", "JOAO");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category, Category::Provento);
        assert_eq!(items[0].code, "1234");
        assert_eq!(items[0].description, "SALARIO BASE");
        assert_eq!(items[0].reference, None);
        assert_eq!(items[0].value, "1000.00");
        assert_eq!(items[0].owner, "JOAO");
    }

    #[test]
    fn test_four_column_row() {
        let extractor = LineItemExtractor::new(RowLayout::FourColumn);
        let text = "0010  SALARIO MENSAL  30,00  3.500,00\n\
                    0020  HORAS EXTRAS 50%  10,50  420,15\n\
                    001  CODIGO CURTO  1,00  1,00\n";
        let items = extractor.extract(text, "ANA");

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].description, "SALARIO MENSAL");
        assert_eq!(items[0].reference.as_deref(), Some("30.00"));
        assert_eq!(items[0].value, "3500.00");
        assert_eq!(items[1].description, "HORAS EXTRAS 50%");
        assert_eq!(items[1].reference.as_deref(), Some("10.50"));
    }

    #[test]
    fn test_four_column_needs_wide_gaps() {
        let extractor = LineItemExtractor::new(RowLayout::FourColumn);
        assert!(extractor.extract("0010 SALARIO 30,00 3.500,00", "ANA").is_empty());
    }

    #[test]
    fn test_category_flips_after_earnings_total() {
        let extractor = LineItemExtractor::new(RowLayout::ThreeColumn);
        let text = "0010 SALARIO 2.000,00\nTOTAL DE PROVENTOS 2.000,00\n0500 INSS 180,00\n";
        let items = extractor.extract(text, "ANA");

        assert_eq!(
            summary(&items),
            vec![
                (Category::Provento, "0010", "2000.00"),
                (Category::Desconto, "0500", "180.00"),
            ]
        );
    }

    #[test]
    fn test_no_sentinel_means_all_earnings() {
        let extractor = LineItemExtractor::new(RowLayout::ThreeColumn);
        let items = extractor.extract("0010 SALARIO 2.000,00\n0500 INSS 180,00\n", "ANA");

        assert!(items.iter().all(|i| i.category == Category::Provento));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_six_digit_code_is_skipped() {
        let extractor = LineItemExtractor::new(RowLayout::ThreeColumn);
        assert!(extractor.extract("123456 SALARIO 100,00", "ANA").is_empty());

        let extractor = LineItemExtractor::new(RowLayout::FourColumn);
        assert!(extractor.extract("123456  SALARIO  1,00  100,00", "ANA").is_empty());
    }

    #[test]
    fn test_blocks_after_header_stop_at_gap() {
        let extractor = LineItemExtractor::new(RowLayout::ThreeColumn);
        let text = "Nome\nMARIA\n\
                    Código Descrição Valor\n\
                    \n\
                    0010 SALARIO 2.000,00\n\
                    0020 ADICIONAL 300,00\n\
                    Observação qualquer\n\
                    0030 FORA DO BLOCO 1,00\n\
                    TOTAL DE PROVENTOS 2.300,00\n\
                    Codigo\nDescricao\nValor\n\
                    0500 INSS 180,00\n\
                    \n\
                    0600 FORA 5,00\n";
        let items = extractor.extract(text, "MARIA");

        assert_eq!(
            summary(&items),
            vec![
                (Category::Provento, "0010", "2000.00"),
                (Category::Provento, "0020", "300.00"),
                (Category::Desconto, "0500", "180.00"),
            ]
        );
    }

    #[test]
    fn test_header_line_with_trailing_row() {
        let extractor = LineItemExtractor::new(RowLayout::ThreeColumn);
        let text = "Código Descrição Valor 0010 SALARIO 2.000,00\n0020 VT 50,00\n";
        let items = extractor.extract(text, "ANA");

        assert_eq!(summary(&items).len(), 2);
        assert_eq!(items[0].code, "0010");
    }

    #[test]
    fn test_never_fails_on_odd_input() {
        let extractor = LineItemExtractor::new(RowLayout::FourColumn);
        assert!(extractor.extract("", "x").is_empty());
        assert!(extractor.extract("Código Descrição Valor", "x").is_empty());
        assert!(extractor.extract("\n\nCódigo\n", "x").is_empty());
        assert!(extractor.extract("TOTAL DE PROVENTOS\nTOTAL DE PROVENTOS", "x").is_empty());
    }
}
