use async_trait::async_trait;
use http::StatusCode;
use rest_framework::response::APPLICATION_JSON;
use rest_framework::{
    BindFailure, BoxError, CapabilityTable, FieldKind, FieldRule, FieldValue, HttpMethod,
    Resolution, Resource, ValidationErrors, ValidationFinding,
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

/// Most units a single widget bin can hold.
pub const MAX_STOCK: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Widget {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
}

impl Widget {
    pub fn new(id: i64, name: impl Into<String>, quantity: i64) -> Self {
        Self {
            id,
            name: name.into(),
            quantity,
        }
    }
}

/// The fixed inventory every request starts from.
pub fn inventory() -> Vec<Widget> {
    vec![
        Widget::new(1, "Sprocket", 12),
        Widget::new(2, "Flange", 0),
        Widget::new(3, "Gizmo", 995),
    ]
}

fn find(id: i64) -> Option<Widget> {
    inventory().into_iter().find(|w| w.id == id)
}

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("No widget selected")]
    NoWidget,
    #[error("Widget {id} cannot hold more than {max} units", max = MAX_STOCK)]
    OverCapacity { id: i64 },
    #[error("Widget {0} still has stock and cannot be deleted")]
    InStock(i64),
}

/// Serves `/widgets`.
///
/// `id` selects a widget from the inventory; an unknown id is answered with a 404
/// before validation runs. `restock` is reached by naming it on a `POST` or `PUT`.
#[derive(Debug, Default)]
pub struct WidgetResource {
    widget: Option<Widget>,
    name: Option<String>,
    quantity: Option<i64>,
}

impl WidgetResource {
    fn selected(&self) -> Result<&Widget, WidgetError> {
        self.widget.as_ref().ok_or(WidgetError::NoWidget)
    }

    fn quantity(&self) -> i64 {
        self.quantity.unwrap_or_default()
    }

    fn create(&self) -> Result<Resolution, BoxError> {
        let next_id = inventory().iter().map(|w| w.id).max().unwrap_or(0) + 1;
        let widget = Widget::new(
            next_id,
            self.name.clone().unwrap_or_else(|| "Unnamed widget".to_string()),
            self.quantity(),
        );
        Ok(Resolution::Stream {
            status: StatusCode::CREATED,
            content_type: APPLICATION_JSON.to_string(),
            body: serde_json::to_vec(&widget)?,
        })
    }

    fn restock(&self) -> Result<Resolution, BoxError> {
        let widget = self.selected()?;
        let quantity = widget
            .quantity
            .checked_add(self.quantity())
            .filter(|quantity| *quantity <= MAX_STOCK)
            .ok_or(WidgetError::OverCapacity { id: widget.id })?;
        debug!(id = widget.id, quantity, "Restocked");
        Ok(Resolution::json(&Widget {
            quantity,
            ..widget.clone()
        })?)
    }

    fn delete(&self) -> Result<Resolution, BoxError> {
        let widget = self.selected()?;
        if widget.quantity > 0 {
            return Err(WidgetError::InStock(widget.id).into());
        }
        Ok(Resolution::json(&json!({ "deleted": widget.id }))?)
    }
}

#[async_trait]
impl Resource for WidgetResource {
    fn capabilities() -> CapabilityTable {
        CapabilityTable::builder()
            .event("get", [HttpMethod::Get])
            .event("post", [HttpMethod::Post])
            .event("delete", [HttpMethod::Delete])
            .event("restock", [HttpMethod::Post, HttpMethod::Put])
            .build()
    }

    fn fields() -> Vec<FieldRule> {
        vec![
            FieldRule::new("id", FieldKind::Integer).required_on(["delete", "restock"]),
            FieldRule::new("name", FieldKind::Text),
            FieldRule::new("quantity", FieldKind::Integer).required_on(["post", "restock"]),
        ]
    }

    fn bind(&mut self, field: &str, value: FieldValue) -> Result<(), BindFailure> {
        match (field, value) {
            ("id", FieldValue::Integer(id)) => {
                let widget =
                    find(id).ok_or_else(|| BindFailure::NotFound(format!("Widget {id} does not exist")))?;
                self.widget = Some(widget);
            }
            ("name", FieldValue::Text(name)) => self.name = Some(name),
            ("quantity", FieldValue::Integer(quantity)) => self.quantity = Some(quantity),
            (field, value) => {
                return Err(BindFailure::Invalid(format!(
                    "Unexpected value {value:?} for {field}"
                )))
            }
        }
        Ok(())
    }

    async fn validate(&self, event: &str, errors: &mut ValidationErrors) {
        if !matches!(event, "post" | "restock") {
            return;
        }
        if let Some(quantity) = self.quantity.filter(|q| *q <= 0) {
            errors.add(
                ValidationFinding::field("quantity", "Quantity must be greater than zero")
                    .with_value(quantity),
            );
        }
    }

    async fn handle(&mut self, event: &str) -> Result<Resolution, BoxError> {
        match event {
            "get" => match &self.widget {
                Some(widget) => Ok(Resolution::json(widget)?),
                None => Ok(Resolution::json(&inventory())?),
            },
            "post" => self.create(),
            "restock" => self.restock(),
            "delete" => self.delete(),
            other => Err(format!("unknown event {other}").into()),
        }
    }
}
