// Demo mode: a realistic part catalog without any backend
//
// Serves a handful of power and analog parts from memory with artificial
// latency so spinners and stale-selection handling are visible. The set
// deliberately covers every failure path the viewer handles:
// - a part with no datasheet path ("Datasheet file not found!")
// - a part whose datasheet signing fails ("Failed to load datasheet")
// - a part with a malformed pin table ("Error parsing pin table data")
// - a part with no checklist row ("could not load part data")
//
// Run with: SHEETVIEW_DEMO=1 cargo run --release

use crate::catalog::memory::MemoryCatalog;
use crate::catalog::{Part, Rule};
use crate::presign::SignedUrlProvider;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// Latency per catalog lookup
const CATALOG_LATENCY: Duration = Duration::from_millis(250);

/// Latency per signed URL
const SIGNING_LATENCY: Duration = Duration::from_millis(600);

/// Storage keys under this prefix refuse to sign
const UNSIGNABLE_PREFIX: &str = "restricted/";

/// One demo catalog row with its checklist
pub struct DemoEntry {
    pub part: Part,
    /// None leaves the part without a checklist
    pub checklist_id: Option<&'static str>,
    pub rules: Vec<Rule>,
}

fn part(
    part_id: &str,
    file_path: Option<&str>,
    manufacturer: &str,
    description: &str,
    package: &str,
    pin_table: Option<Value>,
) -> Part {
    let mut part = Part::new(part_id);
    part.file_path = file_path.map(str::to_string);
    part.pin_table = pin_table;
    part.extra
        .insert("manufacturer".to_string(), Value::from(manufacturer));
    part.extra
        .insert("description".to_string(), Value::from(description));
    part.extra.insert("package".to_string(), Value::from(package));
    part
}

fn essential(category: &str, content: &str) -> Rule {
    Rule::new(Some(category), Some("ESSENTIAL"), content)
}

fn recommended(category: &str, content: &str) -> Rule {
    Rule::new(Some(category), Some("RECOMMENDED"), content)
}

/// The demo catalog, in list order
pub fn demo_entries() -> Vec<DemoEntry> {
    vec![
        DemoEntry {
            part: part(
                "LM317",
                Some("datasheets/ti/lm317.pdf"),
                "Texas Instruments",
                "1.5A adjustable positive voltage regulator",
                "TO-220",
                Some(json!({
                    "pins": [
                        ["Pin", "Name", "Type", "Description"],
                        [1, "ADJ", "I", "Adjust pin, sets output via resistor divider"],
                        [2, "OUTPUT", "O", "Regulated output voltage"],
                        [3, "INPUT", "I", "Unregulated input voltage"]
                    ]
                })),
            ),
            checklist_id: Some("9b1f4c1e-lm317"),
            rules: vec![
                essential("Power", "Place a 0.1uF ceramic capacitor on INPUT close to the pin"),
                essential("Power", "Use at least 1uF on OUTPUT for stability"),
                recommended("Power", "Add a 10uF capacitor on ADJ to improve ripple rejection"),
                recommended("Thermal", "Size the heatsink for (Vin - Vout) x Iload dissipation"),
                essential("Protection", "Add a reverse diode from OUTPUT to INPUT when Cout > 10uF"),
                Rule::new(None, None, "Check the minimum load current of 10mA"),
            ],
        },
        DemoEntry {
            part: part(
                "NE555",
                Some("datasheets/ti/ne555.pdf"),
                "Texas Instruments",
                "Precision timer",
                "SOIC-8",
                // Stored as text, the way the hosted table returns it
                Some(Value::from(
                    r#"{"pins":[["Pin","Name","Description"],["1","GND","Ground"],["2","TRIG","Trigger input"],["3","OUT","Output"],["4","RESET","Active-low reset"],["5","CONT","Control voltage"],["6","THRES","Threshold"],["7","DISCH","Discharge"],["8","VCC","Supply"]]}"#,
                )),
            ),
            checklist_id: Some("2c7d0a55-ne555"),
            rules: vec![
                essential("Power", "Decouple VCC with 0.1uF and 10uF capacitors"),
                recommended("Signal", "Bypass CONT to ground with 10nF when unused"),
                essential("Signal", "Tie RESET to VCC when not used"),
                recommended("Layout", "Keep timing capacitor traces short"),
            ],
        },
        DemoEntry {
            part: part(
                "TPS54331",
                Some("datasheets/ti/tps54331.pdf"),
                "Texas Instruments",
                "3A 28V step-down converter",
                "SOIC-8",
                Some(json!({
                    "pins": [
                        ["Pin", "Name", "Description"],
                        [1, "BOOT", "Bootstrap capacitor to PH"],
                        [2, "VIN", "Input supply"],
                        [3, "EN", "Enable"],
                        [4, "SS", "Slow start"],
                        [5, "VSENSE", "Feedback"],
                        [6, "COMP", "Error amplifier output"],
                        [7, "GND", "Ground"],
                        [8, "PH", "Switch node"]
                    ]
                })),
            ),
            checklist_id: Some("5e3a9f02-tps54331"),
            rules: vec![
                essential("Layout", "Minimize the VIN, PH and GND loop area"),
                essential("Layout", "Route VSENSE away from the PH switch node"),
                recommended("Power", "Use X5R or X7R input capacitors rated above VIN"),
                essential("Power", "Place a 0.1uF BOOT capacitor between BOOT and PH"),
                recommended("Thermal", "Add thermal vias under the GND pin"),
                Rule::new(Some("Compensation"), Some("OPTIONAL"), "Verify loop phase margin"),
            ],
        },
        DemoEntry {
            part: part(
                "AMS1117-3.3",
                None,
                "Advanced Monolithic Systems",
                "1A low dropout regulator, 3.3V",
                "SOT-223",
                None,
            ),
            checklist_id: Some("7a6b1d3c-ams1117"),
            rules: vec![
                essential("Power", "Use a tantalum or low-ESR output capacitor of 22uF"),
                recommended("Thermal", "Use the tab copper area as a heatsink"),
            ],
        },
        DemoEntry {
            part: part(
                "OPA2134",
                Some("restricted/ti/opa2134.pdf"),
                "Texas Instruments",
                "High-performance audio operational amplifier",
                "SOIC-8",
                Some(json!({
                    "pins": [
                        ["Pin", "Name"],
                        [1, "OUT A"], [2, "-IN A"], [3, "+IN A"], [4, "V-"],
                        [5, "+IN B"], [6, "-IN B"], [7, "OUT B"], [8, "V+"]
                    ]
                })),
            ),
            checklist_id: Some("e41f8b77-opa2134"),
            rules: vec![
                essential("Power", "Decouple each supply rail with 0.1uF at the pins"),
                recommended("Signal", "Keep feedback resistors below 10k for low noise"),
            ],
        },
        DemoEntry {
            part: part(
                "MCP2551",
                Some("datasheets/microchip/mcp2551.pdf"),
                "Microchip",
                "High-speed CAN transceiver",
                "SOIC-8",
                Some(Value::from(r#"{"pins": [["Pin", "Name"], [1, "TXD"]"#)),
            ),
            checklist_id: Some("c03e5d19-mcp2551"),
            rules: vec![
                essential("Signal", "Terminate the bus with 120 ohm at each end"),
                recommended("Protection", "Add TVS diodes on CANH and CANL"),
            ],
        },
        DemoEntry {
            part: part(
                "LM358",
                Some("datasheets/ti/lm358.pdf"),
                "Texas Instruments",
                "Dual general purpose operational amplifier",
                "SOIC-8",
                None,
            ),
            checklist_id: None,
            rules: vec![],
        },
    ]
}

/// In-memory catalog for demo mode
pub fn demo_catalog() -> MemoryCatalog {
    demo_entries()
        .into_iter()
        .fold(
            MemoryCatalog::new().with_latency(CATALOG_LATENCY),
            |catalog, entry| match entry.checklist_id {
                Some(checklist_id) => catalog.with_part(entry.part, checklist_id, entry.rules),
                None => catalog.with_orphan_part(entry.part),
            },
        )
}

/// Fake signed URLs with artificial latency
pub struct DemoUrlProvider {
    latency: Duration,
}

impl DemoUrlProvider {
    pub fn new() -> Self {
        Self {
            latency: SIGNING_LATENCY,
        }
    }

    #[cfg(test)]
    fn instant() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }
}

impl Default for DemoUrlProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignedUrlProvider for DemoUrlProvider {
    async fn signed_url(&self, file_path: &str) -> Result<String> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if file_path.starts_with(UNSIGNABLE_PREFIX) {
            anyhow::bail!("Access denied for {file_path}");
        }
        Ok(format!(
            "https://demo-datasheets.s3.us-east-1.amazonaws.com/{file_path}\
             ?X-Amz-Algorithm=AWS4-HMAC-SHA256&X-Amz-Expires=3600&X-Amz-Signature=demo"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, PartRepository};
    use crate::viewer::pins::PinTable;

    #[test]
    fn catalog_covers_every_failure_path() {
        let entries = demo_entries();
        let find = |id: &str| entries.iter().find(|e| e.part.part_id == id).unwrap();

        assert!(find("AMS1117-3.3").part.storage_path().is_none());
        assert!(find("OPA2134")
            .part
            .storage_path()
            .unwrap()
            .starts_with(UNSIGNABLE_PREFIX));
        assert!(PinTable::parse(find("MCP2551").part.pin_table.as_ref()).is_error());
        assert!(find("LM358").checklist_id.is_none());
        assert!(matches!(
            PinTable::parse(find("NE555").part.pin_table.as_ref()),
            PinTable::Table { ref rows, .. } if rows.len() == 8
        ));
    }

    #[tokio::test]
    async fn orphan_part_has_no_checklist() {
        let catalog = demo_catalog().with_latency(Duration::ZERO);
        assert_eq!(catalog.list_parts().await.unwrap().len(), 7);
        assert!(matches!(
            catalog.checklist("LM358").await,
            Err(CatalogError::NotFound { .. })
        ));
        let checklist = catalog.checklist("LM317").await.unwrap();
        assert_eq!(catalog.rules(&checklist.uuid).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn restricted_paths_fail_to_sign() {
        let urls = DemoUrlProvider::instant();
        let url = urls.signed_url("datasheets/ti/lm317.pdf").await.unwrap();
        assert!(url.contains("datasheets/ti/lm317.pdf?X-Amz-Algorithm="));
        assert!(urls.signed_url("restricted/ti/opa2134.pdf").await.is_err());
    }
}
