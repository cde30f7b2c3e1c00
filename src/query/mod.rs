//! Natural-language query dispatcher.
//!
//! A linear pipeline over the stages Idle → Tokenized → Classified →
//! Slotted → Executed → Rendered; any step may fail into ErrorReported,
//! which is terminal and retains no partial state. Only the `create`
//! intent writes to the session store.

pub mod intent;
pub mod session;
pub mod slots;
pub mod tokenizer;

pub use intent::QueryIntent;
pub use session::Session;

use crate::analysis;
use crate::errors::{GeometryError, GeometryResult};
use crate::limits::Budgets;
use crate::shapes::{NShape, Shape};
use crate::types::{
    ComparisonReport, PropertyKind, ReportValue, ScalingReport, ShapeKind, ShapeReport,
};
use intent::{classify, mentioned_shapes, primary_shape};
use serde::{Deserialize, Serialize};
use slots::{
    extract_dimension, extract_name, extract_parameter, extract_property,
    extract_sweep_property,
};
use tokenizer::{tokenize, Token};

/// Default dimension for intents that allow one to be omitted.
const DEFAULT_DIMENSION: u32 = 3;
/// Default shared parameter for comparisons.
const DEFAULT_PARAMETER: f64 = 1.0;
/// Dimension range swept by dimensional analysis.
const SWEEP_RANGE: (u32, u32) = (1, 12);
/// Span of request text attached to error reports.
const SPAN_LIMIT: usize = 80;

/// Pipeline stages of the dispatcher state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStage {
    Idle,
    Tokenized,
    Classified,
    Slotted,
    Executed,
    Rendered,
    ErrorReported,
}

/// One stored shape as shown by the `list` intent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListedShape {
    pub name: String,
    pub kind: ShapeKind,
    pub dimension: u32,
    pub volume: ReportValue,
}

/// Formula walkthrough for the `explain` intent, evaluated at unit
/// parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplainReport {
    pub kind: ShapeKind,
    pub dimension: u32,
    pub volume_formula: String,
    pub surface_formula: String,
    pub unit_volume: ReportValue,
    pub unit_surface: ReportValue,
}

/// Fixed capability catalog returned when no intent matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HelpCatalog {
    pub intents: Vec<String>,
    pub shapes: Vec<String>,
    pub examples: Vec<String>,
}

/// The rendered result of a query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ReportPayload {
    Shape(ShapeReport),
    Comparison(ComparisonReport),
    Scaling(ScalingReport),
    Explanation(ExplainReport),
    Listing(Vec<ListedShape>),
    Catalog(HelpCatalog),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub intent: QueryIntent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored_as: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyKind>,
    pub report: ReportPayload,
}

/// Binds free text to one primitive call against a session store.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    budgets: Budgets,
}

impl Dispatcher {
    pub fn new(budgets: Budgets) -> Self {
        Dispatcher { budgets }
    }

    /// Run the full pipeline for one line of text.
    pub fn execute(&self, session: &mut Session, text: &str) -> GeometryResult<QueryResponse> {
        self.run(session, text).map_err(|err| {
            let err = if err.span.is_none() {
                err.with_span(snippet(text))
            } else {
                err
            };
            log::debug!("query entered {:?}: {}", QueryStage::ErrorReported, err);
            err
        })
    }

    fn run(&self, session: &mut Session, text: &str) -> GeometryResult<QueryResponse> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(GeometryError::query("Query text is empty"));
        }
        let tokens = tokenize(trimmed);
        let intent = classify(&tokens);
        log::debug!(
            "stage {:?}: intent {:?} for {:?}",
            QueryStage::Classified,
            intent,
            snippet(trimmed)
        );
        match intent {
            QueryIntent::Create => self.handle_create(session, &tokens),
            QueryIntent::Property => self.handle_property(&tokens),
            QueryIntent::Compare => self.handle_compare(&tokens),
            QueryIntent::DimAnalysis => self.handle_dim_analysis(&tokens),
            QueryIntent::Explain => self.handle_explain(&tokens),
            QueryIntent::List => Ok(handle_list(session)),
            QueryIntent::Help => Ok(QueryResponse {
                intent: QueryIntent::Help,
                stored_as: None,
                property: None,
                report: ReportPayload::Catalog(help_catalog()),
            }),
        }
    }

    fn handle_create(
        &self,
        session: &mut Session,
        tokens: &[Token],
    ) -> GeometryResult<QueryResponse> {
        let (dimension, consumed) =
            extract_dimension(tokens).ok_or_else(|| GeometryError::missing_slot("dimension"))?;
        self.budgets.check_dimension(dimension)?;
        let kind = primary_shape(tokens);
        let parameter = extract_parameter(tokens, &consumed)
            .ok_or_else(|| GeometryError::missing_slot("parameter"))?;
        let shape = shape_from_text_slots(kind, dimension, parameter)?;
        let report = shape.describe();
        let stored_as = match extract_name(tokens) {
            Some(name) => {
                session.insert_named(&name, shape)?;
                name
            }
            None => session.insert_auto(shape),
        };
        Ok(QueryResponse {
            intent: QueryIntent::Create,
            stored_as: Some(stored_as),
            property: None,
            report: ReportPayload::Shape(report),
        })
    }

    fn handle_property(&self, tokens: &[Token]) -> GeometryResult<QueryResponse> {
        let (dimension, consumed) =
            extract_dimension(tokens).ok_or_else(|| GeometryError::missing_slot("dimension"))?;
        self.budgets.check_dimension(dimension)?;
        let kind = primary_shape(tokens);
        let parameter = extract_parameter(tokens, &consumed)
            .ok_or_else(|| GeometryError::missing_slot("parameter"))?;
        let shape = shape_from_text_slots(kind, dimension, parameter)?;
        Ok(QueryResponse {
            intent: QueryIntent::Property,
            stored_as: None,
            property: Some(extract_property(tokens)),
            report: ReportPayload::Shape(shape.describe()),
        })
    }

    fn handle_compare(&self, tokens: &[Token]) -> GeometryResult<QueryResponse> {
        let kinds = mentioned_shapes(tokens);
        if kinds.len() < 2 {
            return Err(GeometryError::query(
                "Could not identify two shapes to compare",
            )
            .with_slot("shapes"));
        }
        let (dimension, consumed) = extract_dimension(tokens)
            .map(|(d, c)| (d, c.to_vec()))
            .unwrap_or((DEFAULT_DIMENSION, Vec::new()));
        self.budgets.check_dimension(dimension)?;
        let parameter = extract_parameter(tokens, &consumed).unwrap_or(DEFAULT_PARAMETER);
        let a = shape_from_text_slots(kinds[0], dimension, parameter)?;
        let b = shape_from_text_slots(kinds[1], dimension, parameter)?;
        Ok(QueryResponse {
            intent: QueryIntent::Compare,
            stored_as: None,
            property: None,
            report: ReportPayload::Comparison(analysis::compare(&a, &b)),
        })
    }

    fn handle_dim_analysis(&self, tokens: &[Token]) -> GeometryResult<QueryResponse> {
        let kind = primary_shape(tokens);
        // Generic analysis sweeps volume
        let property = extract_sweep_property(tokens).unwrap_or(PropertyKind::Volume);
        let report = analysis::scaling_sweep(
            kind,
            property,
            SWEEP_RANGE.0,
            SWEEP_RANGE.1,
            &[DEFAULT_PARAMETER],
            &self.budgets,
        )?;
        Ok(QueryResponse {
            intent: QueryIntent::DimAnalysis,
            stored_as: None,
            property: None,
            report: ReportPayload::Scaling(report),
        })
    }

    fn handle_explain(&self, tokens: &[Token]) -> GeometryResult<QueryResponse> {
        let kind = primary_shape(tokens);
        let dimension = extract_dimension(tokens)
            .map(|(d, _)| d)
            .unwrap_or(DEFAULT_DIMENSION);
        self.budgets.check_dimension(dimension)?;
        let shape = shape_from_text_slots(kind, dimension, 1.0)?;
        Ok(QueryResponse {
            intent: QueryIntent::Explain,
            stored_as: None,
            property: None,
            report: ReportPayload::Explanation(ExplainReport {
                kind,
                dimension,
                volume_formula: shape.volume_formula(),
                surface_formula: shape.surface_formula(),
                unit_volume: ReportValue::new(shape.volume()),
                unit_surface: ReportValue::new(shape.surface()),
            }),
        })
    }
}

/// Build a shape from the single extracted text parameter, widening it to
/// the kind's arity: an ellipsoid replicates it across all axes, a
/// pyramid uses it for both base side and height.
fn shape_from_text_slots(
    kind: ShapeKind,
    dimension: u32,
    parameter: f64,
) -> GeometryResult<Shape> {
    match kind {
        ShapeKind::Pyramid => Shape::create(kind, dimension, &[parameter, parameter]),
        _ => Shape::create(kind, dimension, &[parameter]),
    }
}

fn handle_list(session: &Session) -> QueryResponse {
    let listing = session
        .iter()
        .map(|(name, shape)| ListedShape {
            name: name.to_string(),
            kind: shape.kind(),
            dimension: shape.dimension(),
            volume: ReportValue::new(shape.volume()),
        })
        .collect();
    QueryResponse {
        intent: QueryIntent::List,
        stored_as: None,
        property: None,
        report: ReportPayload::Listing(listing),
    }
}

fn help_catalog() -> HelpCatalog {
    HelpCatalog {
        intents: vec![
            "create".to_string(),
            "compare".to_string(),
            "property".to_string(),
            "dim_analysis".to_string(),
            "explain".to_string(),
            "list".to_string(),
        ],
        shapes: vec![
            "sphere".to_string(),
            "cube".to_string(),
            "ellipsoid".to_string(),
            "simplex".to_string(),
            "pyramid".to_string(),
        ],
        examples: vec![
            "create a 5d sphere with radius 2".to_string(),
            "volume of a 3d cube with side 1.5".to_string(),
            "compare sphere vs cube in 4 dimensions".to_string(),
            "explain the sphere formula".to_string(),
            "list shapes".to_string(),
        ],
    }
}

fn snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.len() <= SPAN_LIMIT {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(SPAN_LIMIT).collect();
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Budgets::default())
    }

    #[test]
    fn test_create_stores_and_reports() {
        let mut session = Session::new();
        let response = dispatcher()
            .execute(&mut session, "create a 5D sphere with radius 2")
            .unwrap();
        assert_eq!(response.intent, QueryIntent::Create);
        assert_eq!(response.stored_as.as_deref(), Some("shape1"));
        let ReportPayload::Shape(report) = &response.report else {
            panic!("expected a shape report");
        };
        assert_eq!(report.kind, ShapeKind::Sphere);
        assert_eq!(report.dimension, 5);
        let expected = crate::math::unit_ball_volume(5) * 32.0;
        assert_relative_eq!(
            report.volume.finite().unwrap(),
            expected,
            max_relative = 1e-12
        );
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_create_requires_dimension() {
        let mut session = Session::new();
        let err = dispatcher()
            .execute(&mut session, "create a sphere with radius 2")
            .unwrap_err();
        assert_eq!(err.kind, crate::errors::ErrorKind::Query);
        assert_eq!(err.slot.as_deref(), Some("dimension"));
        assert!(err.span.is_some());
        assert!(session.is_empty());
    }

    #[test]
    fn test_compare_defaults() {
        let mut session = Session::new();
        let response = dispatcher()
            .execute(&mut session, "compare sphere vs cube in 4 dimensions")
            .unwrap();
        assert_eq!(response.intent, QueryIntent::Compare);
        let ReportPayload::Comparison(report) = &response.report else {
            panic!("expected a comparison report");
        };
        let pair = &report.ratios["sphere/cube"];
        assert_relative_eq!(
            pair.volume.finite().unwrap(),
            PI * PI / 2.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_property_both() {
        let mut session = Session::new();
        let response = dispatcher()
            .execute(&mut session, "volume and surface of a 3d cube with side 2")
            .unwrap();
        assert_eq!(response.intent, QueryIntent::Property);
        assert_eq!(response.property, Some(PropertyKind::Both));
    }

    #[test]
    fn test_dim_analysis_generic() {
        let mut session = Session::new();
        let response = dispatcher()
            .execute(&mut session, "how does a sphere grow with more dims")
            .unwrap();
        assert_eq!(response.intent, QueryIntent::DimAnalysis);
        let ReportPayload::Scaling(report) = &response.report else {
            panic!("expected a scaling report");
        };
        assert_eq!(report.peak_dim, 5);
    }

    #[test]
    fn test_explain_defaults_to_three_dimensions() {
        let mut session = Session::new();
        let response = dispatcher()
            .execute(&mut session, "explain the sphere formula")
            .unwrap();
        let ReportPayload::Explanation(report) = &response.report else {
            panic!("expected an explanation");
        };
        assert_eq!(report.dimension, 3);
        assert!(report.volume_formula.contains("V_3 = (4/3)πr³"));
    }

    #[test]
    fn test_list_reflects_creation_order() {
        let mut session = Session::new();
        let d = dispatcher();
        d.execute(&mut session, "create a 3d sphere with radius 1")
            .unwrap();
        d.execute(&mut session, "create a 4d cube with side 2")
            .unwrap();
        let response = d.execute(&mut session, "list shapes").unwrap();
        let ReportPayload::Listing(listing) = &response.report else {
            panic!("expected a listing");
        };
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].name, "shape1");
        assert_eq!(listing[1].name, "shape2");
        assert_eq!(listing[1].kind, ShapeKind::Cube);
    }

    #[test]
    fn test_unmatched_text_returns_catalog() {
        let mut session = Session::new();
        let response = dispatcher().execute(&mut session, "good morning").unwrap();
        assert_eq!(response.intent, QueryIntent::Help);
        assert!(matches!(response.report, ReportPayload::Catalog(_)));
    }

    #[test]
    fn test_read_only_intents_are_idempotent() {
        let mut session = Session::new();
        let d = dispatcher();
        d.execute(&mut session, "create a 3d sphere with radius 1")
            .unwrap();
        for text in [
            "volume of a 3d sphere of radius 2",
            "compare sphere vs cube in 4 dimensions",
            "explain the cube formula",
            "list shapes",
        ] {
            let first = d.execute(&mut session, text).unwrap();
            let second = d.execute(&mut session, text).unwrap();
            assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap(),
                "non-idempotent report for {:?}",
                text
            );
        }
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_empty_query() {
        let mut session = Session::new();
        let err = dispatcher().execute(&mut session, "   ").unwrap_err();
        assert_eq!(err.kind, crate::errors::ErrorKind::Query);
    }

    #[test]
    fn test_named_create() {
        let mut session = Session::new();
        let response = dispatcher()
            .execute(&mut session, "create a 3d sphere with radius 1 named probe")
            .unwrap();
        assert_eq!(response.stored_as.as_deref(), Some("probe"));
        let err = dispatcher()
            .execute(&mut session, "create a 3d sphere with radius 1 named probe")
            .unwrap_err();
        assert_eq!(err.kind, crate::errors::ErrorKind::Query);
    }
}
