use axum::http::Method;
use chrono::{NaiveDate, NaiveTime};
use serde_json::{json, Value};

use crate::client::Category;
use crate::shared::constants::CATEGORY_BASE_PATH;

pub const CONSUMER: &str = "admin_client_consumer";
pub const PROVIDER: &str = "admin_service_provider";

#[derive(Debug, Clone)]
pub struct ContractRequest {
    pub method: Method,
    pub path: String,
    /// Exact JSON the consumer sends; `None` for bodiless requests
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ContractResponse {
    pub status: u16,
    /// Matched by shape, not by value. `None` means the body must be empty.
    pub body: Option<Value>,
    /// The response must carry a `Location` ending in the body's id
    pub expects_location: bool,
}

/// One request the client makes and the response it relies on
#[derive(Debug, Clone)]
pub struct Interaction {
    pub description: String,
    pub request: ContractRequest,
    pub response: ContractResponse,
}

impl Interaction {
    fn new(description: &str, method: Method, path: String, body: Option<Value>) -> Self {
        Self {
            description: description.to_string(),
            request: ContractRequest { method, path, body },
            response: ContractResponse {
                status: 200,
                body: None,
                expects_location: false,
            },
        }
    }

    fn responds(mut self, status: u16, body: Option<Value>) -> Self {
        self.response.status = status;
        self.response.body = body;
        self
    }

    fn with_location(mut self) -> Self {
        self.response.expects_location = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Contract {
    pub consumer: String,
    pub provider: String,
    pub interactions: Vec<Interaction>,
}

/// Client-side categories the interactions are built from. Ids and names
/// follow the vehicles catalog the provider is seeded with.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub top: Category,
    pub transport: Category,
    pub autos: Category,
    pub cars: Category,
    pub toyotas: Category,
    pub bikes: Category,
}

impl Fixtures {
    pub fn new() -> Self {
        let top = fixture(0, "Top");
        let transport = fixture(1000, "Transportation").with_parent(top.clone());
        let autos = fixture(1002, "Automobiles").with_parent(transport.clone());
        let cars = fixture(1009, "Cars").with_parent(autos.clone());
        let toyotas = fixture(1015, "Toyota Cars").with_parent(cars.clone());
        let bikes = fixture(1001, "Bikes").with_parent(transport.clone());

        Self {
            top,
            transport,
            autos,
            cars,
            toyotas,
            bikes,
        }
    }

    /// Categories in the order the list interaction returns them
    pub fn listed(&self) -> [&Category; 5] {
        [
            &self.top,
            &self.transport,
            &self.autos,
            &self.cars,
            &self.toyotas,
        ]
    }

    /// `toyotas` as the consumer edits it before updating
    pub fn renamed_toyotas(&self) -> Category {
        let mut renamed = self.toyotas.clone();
        renamed.name = Some("Ford Cars".to_string());
        renamed.header = Some("NewHeader".to_string());
        renamed
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::new()
    }
}

fn fixture(id: i32, name: &str) -> Category {
    let created_at = NaiveDate::from_ymd_opt(2002, 1, 1)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN);

    Category::new(name)
        .with_id(id)
        .with_header("header")
        .with_image_path("n/a")
        .with_created_at(created_at)
}

/// List representation: parent replaced by its id
fn list_item(category: &Category) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(category)?;
    value["parent"] = category.parent_id().map(Value::from).unwrap_or(Value::Null);
    Ok(value)
}

/// Everything the admin client expects from the provider, in replay order
pub fn admin_client_interactions(fixtures: &Fixtures) -> serde_json::Result<Vec<Interaction>> {
    let collection = format!("{}/", CATEGORY_BASE_PATH);
    let toyotas_path = format!("{}/{}", CATEGORY_BASE_PATH, 1015);

    let listed = fixtures
        .listed()
        .into_iter()
        .map(list_item)
        .collect::<serde_json::Result<Vec<_>>>()?;

    let nameless = fixtures.bikes.clone().without_name();

    Ok(vec![
        Interaction::new("Retrieve a category", Method::GET, toyotas_path.clone(), None)
            .responds(200, Some(serde_json::to_value(&fixtures.toyotas)?)),
        Interaction::new("All categories", Method::GET, collection.clone(), None)
            .responds(200, Some(Value::Array(listed))),
        Interaction::new(
            "Create a category",
            Method::POST,
            collection.clone(),
            Some(serde_json::to_value(&fixtures.bikes)?),
        )
        .responds(201, Some(serde_json::to_value(&fixtures.bikes)?))
        .with_location(),
        Interaction::new(
            "Reject a category without a name",
            Method::POST,
            collection,
            Some(serde_json::to_value(&nameless)?),
        )
        .responds(
            400,
            Some(json!({
                "success": false,
                "message": "Validation failed for category: name: must not be null",
                "errors": ["name: must not be null"]
            })),
        ),
        Interaction::new(
            "Update a category",
            Method::PUT,
            toyotas_path.clone(),
            Some(serde_json::to_value(fixtures.renamed_toyotas())?),
        )
        .responds(200, Some(serde_json::to_value(&fixtures.toyotas)?)),
        Interaction::new("Delete a category", Method::DELETE, toyotas_path, None)
            .responds(204, None),
    ])
}

pub fn admin_client_contract() -> serde_json::Result<Contract> {
    Ok(Contract {
        consumer: CONSUMER.to_string(),
        provider: PROVIDER.to_string(),
        interactions: admin_client_interactions(&Fixtures::new())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_order_and_statuses() {
        let contract = admin_client_contract().unwrap();
        assert_eq!(contract.consumer, "admin_client_consumer");
        assert_eq!(contract.provider, "admin_service_provider");

        let summary: Vec<(Method, &str, u16)> = contract
            .interactions
            .iter()
            .map(|i| (i.request.method.clone(), i.request.path.as_str(), i.response.status))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Method::GET, "/admin/category/1015", 200),
                (Method::GET, "/admin/category/", 200),
                (Method::POST, "/admin/category/", 201),
                (Method::POST, "/admin/category/", 400),
                (Method::PUT, "/admin/category/1015", 200),
                (Method::DELETE, "/admin/category/1015", 204),
            ]
        );
    }

    #[test]
    fn test_list_body_flattens_parents() {
        let interactions = admin_client_interactions(&Fixtures::new()).unwrap();
        let list = interactions[1].response.body.as_ref().unwrap();

        assert_eq!(list[0]["id"], 0);
        assert!(list[0]["parent"].is_null());
        assert_eq!(list[1]["parent"], 0);
        assert_eq!(list[4]["parent"], 1009);
    }

    #[test]
    fn test_detail_body_nests_parents() {
        let interactions = admin_client_interactions(&Fixtures::new()).unwrap();
        let toyotas = interactions[0].response.body.as_ref().unwrap();

        assert_eq!(toyotas["parent"]["parent"]["parent"]["name"], "Transportation");
        assert_eq!(toyotas["createdAt"], "2002-01-01T00:00:00");
    }

    #[test]
    fn test_rejected_request_has_no_name() {
        let interactions = admin_client_interactions(&Fixtures::new()).unwrap();
        let body = interactions[3].request.body.as_ref().unwrap();

        assert!(body.get("name").is_none());
        assert_eq!(body["parent"]["id"], 1000);
    }
}
