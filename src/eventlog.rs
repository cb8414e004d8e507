//! Line-delimited JSON event log (C13). A pure observer: nothing in this
//! module ever feeds back into a numeric result, and disabling the log
//! must not change any component's output.

use serde::Serialize;
use std::io::{self, Write};

/// A single player's strategy flip within one driver iteration.
#[derive(Debug, Clone, Serialize)]
pub struct Update {
    pub id: u64,
    pub old: u8,
    pub new: u8,
    pub u: f64,
}

#[derive(Debug, Serialize)]
struct StepRecord<'a> {
    iteration: u64,
    algorithm: &'a str,
    updates: &'a [Update],
}

#[derive(Debug, Serialize)]
struct MatchRecord<'a> {
    algorithm: &'static str,
    buyer: u64,
    vendor: u64,
    price: i64,
    utility: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct VcgRecord {
    algorithm: &'static str,
    node: u64,
    bid: f64,
    payment: f64,
}

/// Appends one JSON object per line to an arbitrary [`Write`] sink.
pub struct EventLog<W: Write> {
    sink: W,
}

impl<W: Write> EventLog<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn log_step(&mut self, iteration: u64, algorithm: &str, updates: &[Update]) -> io::Result<()> {
        let record = StepRecord { iteration, algorithm, updates };
        self.write_line(&record)
    }

    pub fn log_match(&mut self, buyer: u64, vendor: u64, price: i64, utility: f64) -> io::Result<()> {
        let record = MatchRecord { algorithm: "MATCHING", buyer, vendor, price, utility, note: None };
        self.write_line(&record)
    }

    pub fn log_vcg_payment(&mut self, node: u64, bid: f64, payment: f64) -> io::Result<()> {
        let record = VcgRecord { algorithm: "VCG", node, bid, payment };
        self.write_line(&record)
    }

    fn write_line<T: Serialize>(&mut self, record: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.sink, record)?;
        self.sink.write_all(b"\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_step_emits_one_json_line() {
        let mut buf = Vec::new();
        {
            let mut log = EventLog::new(&mut buf);
            let updates = vec![Update { id: 0, old: 0, new: 1, u: -1.0 }];
            log.log_step(3, "BRD", &updates).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["iteration"], 3);
        assert_eq!(parsed["algorithm"], "BRD");
        assert_eq!(parsed["updates"][0]["new"], 1);
    }

    #[test]
    fn log_match_emits_a_matching_record() {
        let mut buf = Vec::new();
        {
            let mut log = EventLog::new(&mut buf);
            log.log_match(5, 2, 30, 45.0).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["algorithm"], "MATCHING");
        assert_eq!(parsed["buyer"], 5);
        assert_eq!(parsed["vendor"], 2);
        assert_eq!(parsed["price"], 30);
        assert_eq!(parsed["utility"], 45.0);
    }

    #[test]
    fn log_vcg_payment_emits_a_vcg_record() {
        let mut buf = Vec::new();
        {
            let mut log = EventLog::new(&mut buf);
            log.log_vcg_payment(7, 20.0, 12.5).unwrap();
        }
        let text = String::from_utf8(buf).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["algorithm"], "VCG");
        assert_eq!(parsed["node"], 7);
        assert_eq!(parsed["bid"], 20.0);
        assert_eq!(parsed["payment"], 12.5);
    }
}
