use crate::application::ProcessingOutcome;
use crate::domain::message::{Message, TimestampMs};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

const HEADER: [&str; 7] = [
    "timestamp", "sender", "status", "phone", "amount", "detail", "flags",
];

#[derive(Serialize)]
struct OutcomeRow<'a> {
    timestamp: TimestampMs,
    sender: &'a str,
    status: &'static str,
    phone: Option<&'a str>,
    amount: Option<Decimal>,
    detail: String,
    flags: String,
}

/// Writes one CSV row per processed message.
///
/// The header is emitted before the first row, or by [`finish`](Self::finish)
/// when there were no rows at all.
pub struct OutcomeWriter<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl<W: Write> OutcomeWriter<W> {
    pub fn new(sink: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(sink);
        Self {
            writer,
            header_written: false,
        }
    }

    pub fn write_outcome(&mut self, message: &Message, outcome: &ProcessingOutcome) -> Result<()> {
        self.ensure_header()?;
        let validation = outcome.validation();
        let flags = validation
            .flags
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join("|");

        self.writer.serialize(OutcomeRow {
            timestamp: message.timestamp(),
            sender: message.sender(),
            status: outcome.status(),
            phone: validation.phone.as_deref(),
            amount: validation.amount,
            detail: outcome.detail(),
            flags,
        })?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.ensure_header()?;
        self.writer.flush()?;
        Ok(())
    }

    fn ensure_header(&mut self) -> Result<()> {
        if !self.header_written {
            self.writer.write_record(HEADER)?;
            self.header_written = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fault::{AppError, ErrorType, UserNotice};
    use crate::domain::message::TransactionRecord;
    use crate::domain::validation::{ValidationFlag, ValidationResult};
    use rust_decimal_macros::dec;

    fn render(rows: &[(Message, ProcessingOutcome)]) -> String {
        let mut buffer = Vec::new();
        {
            let mut writer = OutcomeWriter::new(&mut buffer);
            for (message, outcome) in rows {
                writer.write_outcome(message, outcome).unwrap();
            }
            writer.finish().unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(render(&[]), "timestamp,sender,status,phone,amount,detail,flags\n");
    }

    #[test]
    fn test_rows_for_each_status() {
        let accepted_validation = ValidationResult {
            valid: true,
            amount: Some(dec!(5000)),
            phone: Some("254712345678".to_string()),
            flags: vec![ValidationFlag::SuspiciousPhone, ValidationFlag::UnusualAmount],
            warnings: vec!["first".to_string(), "second".to_string()],
            ..ValidationResult::default()
        };
        let accepted = ProcessingOutcome::Accepted {
            record: TransactionRecord::new("254712345678", dec!(5000), "KES 5,000", 1),
            validation: accepted_validation,
        };
        let rejected = ProcessingOutcome::Rejected {
            validation: ValidationResult::default(),
            error: AppError::new(ErrorType::InvalidPhone, "No phone number found in message"),
            notice: UserNotice::Silent,
        };

        let output = render(&[
            (Message::new("KES 5,000", "MPESA", 1), accepted),
            (Message::new("hello", "FRIEND", 2), rejected),
        ]);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "1,MPESA,ACCEPTED,254712345678,5000,first; second,suspicious_phone|unusual_amount"
        );
        assert_eq!(lines[2], "2,FRIEND,REJECTED,,,No phone number found in message,");
    }
}
