//! Response bodies for the query server (JSON and XML).

use serde::Serialize;

use district_pip::{District, DistrictLookup};

/// Output format requested with `output=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Xml,
}

impl OutputFormat {
    /// JSON when absent; `None` for anything unrecognized
    pub fn parse(output: Option<&str>) -> Option<Self> {
        match output {
            None | Some("json") => Some(OutputFormat::Json),
            Some("xml") => Some(OutputFormat::Xml),
            Some(_) => None,
        }
    }
}

/// Lookup result as returned to clients
#[derive(Debug, Serialize)]
pub struct DistrictResponse<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'a str>,
    pub latitude: f64,
    pub longitude: f64,
    pub districts: &'a [District],
}

impl<'a> DistrictResponse<'a> {
    pub fn new(address: Option<&'a str>, lookup: &'a DistrictLookup) -> Self {
        Self {
            address,
            latitude: lookup.lat,
            longitude: lookup.lng,
            districts: &lookup.districts,
        }
    }

    pub fn to_xml(&self) -> String {
        let districts = self
            .districts
            .iter()
            .map(|d| {
                format!(
                    "  <district state=\"{}\">{}</district>",
                    xml_escape(&d.state),
                    xml_escape(&d.district)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let address = self
            .address
            .map(|a| format!("  <address>{}</address>\n", xml_escape(a)))
            .unwrap_or_default();

        format!(
            "<results>\n{}  <latitude>{}</latitude>\n  <longitude>{}</longitude>\n  <districts>\n{}\n  </districts>\n</results>",
            address, self.latitude, self.longitude, districts
        )
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> DistrictLookup {
        DistrictLookup {
            lat: 30.5,
            lng: -88.25,
            districts: vec![District::new("AL", "1")],
        }
    }

    #[test]
    fn test_output_format() {
        assert_eq!(OutputFormat::parse(None), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse(Some("json")), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse(Some("xml")), Some(OutputFormat::Xml));
        assert_eq!(OutputFormat::parse(Some("csv")), None);
    }

    #[test]
    fn test_json_shape() {
        let lookup = lookup();
        let body = serde_json::to_value(DistrictResponse::new(Some("Mobile, AL"), &lookup)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "address": "Mobile, AL",
                "latitude": 30.5,
                "longitude": -88.25,
                "districts": [{"state": "AL", "district": "1"}]
            })
        );
    }

    #[test]
    fn test_xml_shape() {
        let lookup = lookup();
        let xml = DistrictResponse::new(Some("A & B <St>"), &lookup).to_xml();
        assert_eq!(
            xml,
            "<results>\n  <address>A &amp; B &lt;St&gt;</address>\n  <latitude>30.5</latitude>\n  <longitude>-88.25</longitude>\n  <districts>\n  <district state=\"AL\">1</district>\n  </districts>\n</results>"
        );
    }

    #[test]
    fn test_xml_without_address() {
        let lookup = lookup();
        let xml = DistrictResponse::new(None, &lookup).to_xml();
        assert!(!xml.contains("<address>"));
    }
}
