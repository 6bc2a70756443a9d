//! Test utilities for particle size export parser testing
//!
//! This module provides an export builder that produces analyser-shaped
//! content and helpers that write it as UTF-16 to temporary files.

use std::io::Write;
use tempfile::NamedTempFile;

// Test modules
mod parser_tests;

/// One sample column in a generated export
#[derive(Debug, Clone)]
pub struct TestSample {
    pub id: String,
    pub mra: String,
    pub label: String,
    pub obscuration: String,
}

impl TestSample {
    pub fn new(id: &str, mra: &str, label: &str, obscuration: &str) -> Self {
        Self {
            id: id.to_string(),
            mra: mra.to_string(),
            label: label.to_string(),
            obscuration: obscuration.to_string(),
        }
    }
}

/// Builder for analyser export content
#[derive(Debug, Clone)]
pub struct ExportBuilder {
    pub samples: Vec<TestSample>,
    pub empty_metadata_samples: Vec<String>,
    pub measurement_only_samples: Vec<String>,
    pub bins: usize,
    pub second_blank: bool,
}

impl Default for ExportBuilder {
    fn default() -> Self {
        Self {
            samples: vec![
                TestSample::new("S1", "MRA-001", "M2:XYZ12-3A4 granulate", "12,5"),
                TestSample::new("S2", "MRA-002", "M1;ABC34-5B7 tablet", "10,1"),
                TestSample::new("S3", "MRA-003", "Free text sample", "9,8"),
            ],
            empty_metadata_samples: Vec::new(),
            measurement_only_samples: Vec::new(),
            bins: 100,
            second_blank: true,
        }
    }
}

impl ExportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(mut self, samples: Vec<TestSample>) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_empty_metadata_sample(mut self, id: &str) -> Self {
        self.empty_metadata_samples.push(id.to_string());
        self
    }

    pub fn with_measurement_only_sample(mut self, id: &str) -> Self {
        self.measurement_only_samples.push(id.to_string());
        self
    }

    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    pub fn without_second_blank(mut self) -> Self {
        self.second_blank = false;
        self
    }

    /// Size class of a bin, as written by the analyser (comma decimal)
    pub fn size_label(bin: usize) -> String {
        format!("{:.3}", 0.2 + bin as f64 * 0.25).replace('.', ",")
    }

    /// Value of a sample in a bin
    pub fn value(sample: usize, bin: usize) -> f64 {
        ((sample + 1) * 100 + bin) as f64 / 100.0
    }

    /// Render the export as text
    pub fn build(&self) -> String {
        let mut lines: Vec<String> = vec![
            "Instrument\tMastersizer 3000".into(),
            "Software\t3.81".into(),
            "Operator\tQC lab".into(),
            "Export\tParticle size".into(),
            String::new(),
        ];

        let metadata_ids: Vec<&str> = self
            .samples
            .iter()
            .map(|s| s.id.as_str())
            .chain(self.empty_metadata_samples.iter().map(String::as_str))
            .collect();
        let padding = "\t".repeat(self.empty_metadata_samples.len());

        lines.push(format!("Sample Name\t{}", metadata_ids.join("\t")));
        let attribute = |name: &str, f: fn(&TestSample) -> &str| {
            let values: Vec<&str> = self.samples.iter().map(f).collect();
            format!("{}\t{}{}", name, values.join("\t"), padding)
        };
        lines.push(attribute("Comment 1", |s| &s.mra));
        lines.push(attribute("Comment 2", |s| &s.label));
        lines.push(attribute("Obscuration", |s| &s.obscuration));

        if self.second_blank {
            lines.push("\t".repeat(metadata_ids.len()));
        }
        lines.push("Result Distribution".into());
        lines.push("Volume Density (%)".into());

        let measurement_ids: Vec<&str> = self
            .samples
            .iter()
            .map(|s| s.id.as_str())
            .chain(self.measurement_only_samples.iter().map(String::as_str))
            .collect();
        lines.push(format!("Bin\tSize Classes (um)\t{}", measurement_ids.join("\t")));
        for bin in 0..self.bins {
            let values: Vec<String> = (0..measurement_ids.len())
                .map(|sample| format!("\"{}\"", format!("{:.2}", Self::value(sample, bin)).replace('.', ",")))
                .collect();
            lines.push(format!(
                "{}\t\"{}\"\t{}",
                bin + 1,
                Self::size_label(bin),
                values.join("\t")
            ));
        }

        let mut content = lines.join("\r\n");
        content.push_str("\r\n");
        content
    }

    /// Write the export as UTF-16LE with a byte-order mark
    pub fn write(&self) -> NamedTempFile {
        write_utf16(&self.build())
    }
}

/// Encode text as UTF-16LE with a byte-order mark
pub fn encode_utf16(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

/// Helper to create a temporary UTF-16 file with given content
pub fn write_utf16(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(&encode_utf16(content)).unwrap();
    temp_file.flush().unwrap();
    temp_file
}
