use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// Body for POST /calculate-price; field names follow the server
#[derive(Debug, Clone, Serialize)]
pub struct PriceRequest {
    pub sport: String,
    pub date: NaiveDate,
    #[serde(rename = "timeSlot")]
    pub time_slot: String,
    pub team: String,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub base_price: i64,
    #[serde(default)]
    pub discounts: Vec<Discount>,
    pub final_amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "INR".to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBookingDetails {
    pub sport: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub team: String,
    pub notes: String,
    pub booking_id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub booking_details: PaymentBookingDetails,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantDetails {
    pub name: String,
    pub upi_id: String,
    pub amount: i64,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiation {
    pub upi_links: HashMap<String, String>,
    pub merchant_details: MerchantDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpiApp {
    Default,
    GPay,
    PhonePe,
    Paytm,
}

impl UpiApp {
    pub fn key(&self) -> &'static str {
        match self {
            UpiApp::Default => "default",
            UpiApp::GPay => "gpay",
            UpiApp::PhonePe => "phonepe",
            UpiApp::Paytm => "paytm",
        }
    }
}

impl PaymentInitiation {
    /// Deep link for the requested app, falling back to the generic UPI link.
    pub fn link_for(&self, app: UpiApp) -> Option<&str> {
        self.upi_links
            .get(app.key())
            .or_else(|| self.upi_links.get(UpiApp::Default.key()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_parses_camel_case() {
        let quote: PriceQuote = serde_json::from_value(json!({
            "basePrice": 1200,
            "discounts": [{"name": "Group Booking Discount", "description": "10% off", "amount": 120}],
            "finalAmount": 1080,
            "currency": "INR"
        }))
        .unwrap();

        assert_eq!(quote.final_amount, 1080);
        assert_eq!(quote.discounts.len(), 1);
    }

    #[test]
    fn test_link_falls_back_to_default() {
        let mut upi_links = HashMap::new();
        upi_links.insert("default".to_string(), "upi://pay?pa=x".to_string());
        upi_links.insert("gpay".to_string(), "gpay://upi/pay?pa=x".to_string());

        let initiation = PaymentInitiation {
            upi_links,
            merchant_details: MerchantDetails {
                name: "TurfZone".to_string(),
                upi_id: "x".to_string(),
                amount: 1080,
                note: "TurfZone-Football-2035-03-30".to_string(),
            },
        };

        assert_eq!(initiation.link_for(UpiApp::GPay), Some("gpay://upi/pay?pa=x"));
        assert_eq!(initiation.link_for(UpiApp::Paytm), Some("upi://pay?pa=x"));
    }
}
