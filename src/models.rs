use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Trip name length cap, in characters
pub const TRIP_NAME_MAX: usize = 25;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trip {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "trip_name", default)]
    pub name: String,
    #[serde(rename = "destination", default)]
    pub destinations: Vec<String>,
    #[serde(rename = "trip_starting_time", default)]
    pub start_date: String,
    #[serde(rename = "trip_ending_time", default)]
    pub end_date: String,
    #[serde(rename = "fund_goals", default)]
    pub fund_goal: u64,
    #[serde(rename = "owner", default, deserialize_with = "owner_id")]
    pub owner_id: String,
}

/// Trip payload as handed between screens: `{ "trip": { ... } }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripDetails {
    pub trip: Trip,
}

impl TripDetails {
    /// Stand-in for a trip whose details have not arrived yet
    pub fn pending(id: impl Into<String>) -> Self {
        Self {
            trip: Trip {
                id: id.into(),
                name: String::new(),
                destinations: Vec::new(),
                start_date: String::new(),
                end_date: String::new(),
                fund_goal: 0,
                owner_id: String::new(),
            },
        }
    }
}

/// The backend sends the owner either as a bare id or as a populated user.
#[derive(Deserialize)]
#[serde(untagged)]
enum OwnerRef {
    Id(String),
    User {
        #[serde(rename = "_id")]
        id: String,
    },
}

fn owner_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let owner = Option::<OwnerRef>::deserialize(deserializer)?;
    Ok(match owner {
        Some(OwnerRef::Id(id)) | Some(OwnerRef::User { id }) => id,
        None => String::new(),
    })
}

/// A single payment entry. Only the fields the budget screen shows are typed;
/// everything else the backend sends is kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PaymentRecord {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PaymentRecord {
    /// Best human label the record carries
    pub fn label(&self) -> String {
        ["description", "note", "name", "paid_by"]
            .iter()
            .find_map(|key| self.extra.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| "Payment".to_string())
    }

    /// Date part of `createdAt`, if present
    pub fn date(&self) -> Option<&str> {
        self.created_at.as_deref().map(|s| s.get(..10).unwrap_or(s))
    }
}

#[derive(Debug, Deserialize)]
pub struct PaymentDetailsResponse {
    pub data: PaymentDetailsData,
}

#[derive(Debug, Deserialize)]
pub struct PaymentDetailsData {
    pub payments: PaymentPage,
}

#[derive(Debug, Deserialize)]
pub struct PaymentPage {
    #[serde(default)]
    pub docs: Vec<PaymentRecord>,
}

#[derive(Debug, Deserialize)]
pub struct SingleTripResponse {
    pub data: TripDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentQuery {
    pub page: u32,
    pub limit: u32,
}

impl Default for PaymentQuery {
    fn default() -> Self {
        Self { page: 1, limit: 100 }
    }
}

/// Fields sent with a trip update, already validated and unformatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripUpdate {
    pub trip_name: String,
    pub trip_starting_time: String,
    pub trip_ending_time: String,
    pub owner: String,
    pub fund_goals: u64,
    pub destinations: Vec<String>,
}

impl TripUpdate {
    /// Flatten into multipart form fields, destinations as `destination[i]`
    pub fn multipart_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("trip_name".to_string(), self.trip_name.clone()),
            (
                "trip_starting_time".to_string(),
                self.trip_starting_time.clone(),
            ),
            ("trip_ending_time".to_string(), self.trip_ending_time.clone()),
            ("owner".to_string(), self.owner.clone()),
            ("fund_goals".to_string(), self.fund_goals.to_string()),
        ];
        fields.extend(
            self.destinations
                .iter()
                .enumerate()
                .map(|(i, d)| (format!("destination[{}]", i), d.clone())),
        );
        fields
    }
}
