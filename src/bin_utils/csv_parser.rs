use std::io::Read;

use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::statement::OperationType;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Register,
    Deposit,
    Withdraw,
}

impl OperationKind {
    /// Statement type recorded by this operation, if any.
    pub fn statement_type(self) -> Option<OperationType> {
        match self {
            OperationKind::Register => None,
            OperationKind::Deposit => Some(OperationType::Deposit),
            OperationKind::Withdraw => Some(OperationType::Withdraw),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Operation {
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub password: String,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
}

/// Parses operation list in CSV format.
/// Yields the line number together with each row, malformed rows included.
pub struct CsvOperationParser<R> {
    iter: DeserializeRecordsIntoIter<R, Operation>,
}

impl<R> CsvOperationParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvOperationParser<R>
where
    R: Read,
{
    type Item = (u64, Result<Operation, csv::Error>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::FromPrimitive;

    use super::*;

    #[test]
    fn parse_operations() {
        let input = "\
type, email, name, password, amount, description
register, jane@example.com, Jane, hunter2, ,
deposit, jane@example.com, , hunter2, 100.50, salary
withdraw, jane@example.com, , hunter2, 20
transfer, jane@example.com, , hunter2, 1, nope
";
        let rows: Vec<_> = CsvOperationParser::new(input.as_bytes()).collect();
        assert_eq!(rows.len(), 4);

        let (_, register) = &rows[0];
        let register = register.as_ref().unwrap();
        assert_eq!(register.kind, OperationKind::Register);
        assert_eq!(register.name, "Jane");
        assert_eq!(register.amount, None);

        let (_, deposit) = &rows[1];
        let deposit = deposit.as_ref().unwrap();
        assert_eq!(deposit.kind.statement_type(), Some(OperationType::Deposit));
        assert_eq!(deposit.amount, Some(Decimal::new(10050, 2)));
        assert_eq!(deposit.description.as_deref(), Some("salary"));

        // trailing description omitted
        let (_, withdraw) = &rows[2];
        let withdraw = withdraw.as_ref().unwrap();
        assert_eq!(withdraw.amount, Some(Decimal::from_u32(20).unwrap()));
        assert_eq!(withdraw.description, None);

        let (_, unknown) = &rows[3];
        assert!(unknown.is_err());
    }
}
