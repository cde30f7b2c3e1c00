//! N-dimensional geometry kernel.
//!
//! The core behind the hypershape platform adapters:
//! - Shape library over arbitrary dimension (sphere, cube, ellipsoid,
//!   simplex, pyramid) with exact measure formulas and derived invariants
//! - Tessellation engine (regular, hexagonal, Voronoi) with coverage,
//!   coordination, and symmetry analysis
//! - Natural-language dispatcher binding free text to primitive calls
//!   over a per-session shape store
//! - Comparison/scaling analytics and a deterministic scene encoder
//!
//! The kernel is purely functional apart from the session store and the
//! content-addressed tiling registry held by [`GeometryKernel`]. Every
//! operation is bounded by soft [`limits::Budgets`] and fails fast with a
//! structured error; the JSON surface always returns valid JSON, even on
//! errors.

pub mod analysis;
pub mod errors;
pub mod hashing;
pub mod limits;
pub mod math;
pub mod query;
pub mod scene;
pub mod shapes;
pub mod tiling;
pub mod types;

pub use errors::{ErrorKind, GeometryError, GeometryResult};
pub use limits::Budgets;
pub use query::{Dispatcher, QueryResponse, Session};
pub use shapes::{NShape, Shape};
pub use types::{
    ComparisonReport, PropertyKind, Region, ScalingReport, ShapeKind, ShapeReport,
    TilingKind, TilingReport,
};

use analysis::BatchItem;
use scene::{SceneDescription, SceneView};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tiling::{TilingAnalyzer, TilingPattern, TilingRequest};

/// One structured request: `{op, args}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "args")]
pub enum Request {
    #[serde(rename = "shape.create")]
    ShapeCreate {
        kind: ShapeKind,
        dimension: u32,
        parameters: Vec<f64>,
    },
    #[serde(rename = "shape.describe")]
    ShapeDescribe {
        kind: ShapeKind,
        dimension: u32,
        parameters: Vec<f64>,
    },
    #[serde(rename = "shape.compare")]
    ShapeCompare {
        kind_a: ShapeKind,
        dimension: u32,
        params_a: Vec<f64>,
        kind_b: ShapeKind,
        params_b: Vec<f64>,
    },
    #[serde(rename = "shape.scaling")]
    ShapeScaling {
        kind: ShapeKind,
        property: PropertyKind,
        dimension_range: [u32; 2],
        parameters: Vec<f64>,
    },
    #[serde(rename = "shape.batch")]
    ShapeBatch {
        items: Vec<BatchItem>,
        operations: Vec<String>,
    },
    #[serde(rename = "tiling.generate")]
    TilingGenerate(TilingRequest),
    #[serde(rename = "tiling.analyze")]
    TilingAnalyze { handle: String },
    #[serde(rename = "query.execute")]
    QueryExecute { session_id: String, text: String },
    #[serde(rename = "scene.encode")]
    SceneEncode {
        target: SceneTarget,
        #[serde(default)]
        view: SceneView,
    },
}

/// What `scene.encode` renders: a shape by value or a generated tiling by
/// handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SceneTarget {
    Tiling {
        handle: String,
    },
    Shape {
        kind: ShapeKind,
        dimension: u32,
        parameters: Vec<f64>,
    },
}

/// Typed result of a dispatched request.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    Shape(ShapeReport),
    Comparison(ComparisonReport),
    Scaling(ScalingReport),
    Batch(Vec<ShapeReport>),
    Tiling(TilingReport),
    Query(QueryResponse),
    Scene(SceneDescription),
}

struct StoredTiling {
    pattern: Box<dyn TilingPattern>,
    report: TilingReport,
}

/// Entry point for the structured and natural-language surfaces.
///
/// Holds the per-session shape stores and the content-addressed tiling
/// registry; everything else is stateless. A façade multiplexing sessions
/// onto threads must wrap the kernel in an exclusive lock.
pub struct GeometryKernel {
    budgets: Budgets,
    dispatcher: Dispatcher,
    sessions: HashMap<String, Session>,
    tilings: HashMap<String, StoredTiling>,
}

impl GeometryKernel {
    pub fn new() -> Self {
        Self::with_budgets(Budgets::default())
    }

    pub fn with_budgets(budgets: Budgets) -> Self {
        GeometryKernel {
            budgets,
            dispatcher: Dispatcher::new(budgets),
            sessions: HashMap::new(),
            tilings: HashMap::new(),
        }
    }

    /// Construct a shape and describe it. The structured surface is
    /// stateless; only the natural-language `create` intent stores shapes.
    pub fn create_shape(
        &self,
        kind: ShapeKind,
        dimension: u32,
        parameters: &[f64],
    ) -> GeometryResult<ShapeReport> {
        self.describe_shape(kind, dimension, parameters)
    }

    pub fn describe_shape(
        &self,
        kind: ShapeKind,
        dimension: u32,
        parameters: &[f64],
    ) -> GeometryResult<ShapeReport> {
        self.budgets.check_dimension(dimension)?;
        Ok(Shape::create(kind, dimension, parameters)?.describe())
    }

    pub fn compare_shapes(
        &self,
        kind_a: ShapeKind,
        dimension: u32,
        params_a: &[f64],
        kind_b: ShapeKind,
        params_b: &[f64],
    ) -> GeometryResult<ComparisonReport> {
        self.budgets.check_dimension(dimension)?;
        let a = Shape::create(kind_a, dimension, params_a)?;
        let b = Shape::create(kind_b, dimension, params_b)?;
        Ok(analysis::compare(&a, &b))
    }

    pub fn scaling(
        &self,
        kind: ShapeKind,
        property: PropertyKind,
        dimension_range: [u32; 2],
        parameters: &[f64],
    ) -> GeometryResult<ScalingReport> {
        analysis::scaling_sweep(
            kind,
            property,
            dimension_range[0],
            dimension_range[1],
            parameters,
            &self.budgets,
        )
    }

    pub fn batch(
        &self,
        items: &[BatchItem],
        operations: &[String],
    ) -> GeometryResult<Vec<ShapeReport>> {
        analysis::batch(items, operations, &self.budgets)
    }

    /// Generate a tiling; identical requests share a handle and hit the
    /// registry cache.
    pub fn generate_tiling(&mut self, request: &TilingRequest) -> GeometryResult<TilingReport> {
        let handle = hashing::handle_for(request);
        if let Some(stored) = self.tilings.get(&handle) {
            log::debug!("tiling cache hit for {}", handle);
            return Ok(stored.report.clone());
        }
        let pattern = tiling::generate(request, &self.budgets)?;
        let report = TilingAnalyzer::analyze(pattern.as_ref(), &handle);
        self.tilings.insert(
            handle,
            StoredTiling {
                pattern,
                report: report.clone(),
            },
        );
        Ok(report)
    }

    /// Report a previously generated tiling by handle.
    pub fn analyze_tiling(&self, handle: &str) -> GeometryResult<TilingReport> {
        self.tilings
            .get(handle)
            .map(|stored| stored.report.clone())
            .ok_or_else(|| {
                GeometryError::domain(format!("Unknown tiling handle: {}", handle))
            })
    }

    /// Run one line of free text against a session store.
    pub fn execute_query(
        &mut self,
        session_id: &str,
        text: &str,
    ) -> GeometryResult<QueryResponse> {
        let session = self.sessions.entry(session_id.to_string()).or_default();
        self.dispatcher.execute(session, text)
    }

    pub fn encode_shape_scene(
        &self,
        kind: ShapeKind,
        dimension: u32,
        parameters: &[f64],
        view: &SceneView,
    ) -> GeometryResult<SceneDescription> {
        self.budgets.check_dimension(dimension)?;
        let shape = Shape::create(kind, dimension, parameters)?;
        scene::encode_shape(&shape, view)
    }

    pub fn encode_tiling_scene(
        &self,
        handle: &str,
        view: &SceneView,
    ) -> GeometryResult<SceneDescription> {
        let stored = self.tilings.get(handle).ok_or_else(|| {
            GeometryError::domain(format!("Unknown tiling handle: {}", handle))
        })?;
        scene::encode_tiling(stored.pattern.as_ref(), view)
    }

    /// Dispatch one typed request.
    pub fn dispatch(&mut self, request: Request) -> GeometryResult<Response> {
        match request {
            Request::ShapeCreate {
                kind,
                dimension,
                parameters,
            } => Ok(Response::Shape(self.create_shape(kind, dimension, &parameters)?)),
            Request::ShapeDescribe {
                kind,
                dimension,
                parameters,
            } => Ok(Response::Shape(self.describe_shape(
                kind,
                dimension,
                &parameters,
            )?)),
            Request::ShapeCompare {
                kind_a,
                dimension,
                params_a,
                kind_b,
                params_b,
            } => Ok(Response::Comparison(self.compare_shapes(
                kind_a, dimension, &params_a, kind_b, &params_b,
            )?)),
            Request::ShapeScaling {
                kind,
                property,
                dimension_range,
                parameters,
            } => Ok(Response::Scaling(self.scaling(
                kind,
                property,
                dimension_range,
                &parameters,
            )?)),
            Request::ShapeBatch { items, operations } => {
                Ok(Response::Batch(self.batch(&items, &operations)?))
            }
            Request::TilingGenerate(tiling_request) => {
                Ok(Response::Tiling(self.generate_tiling(&tiling_request)?))
            }
            Request::TilingAnalyze { handle } => {
                Ok(Response::Tiling(self.analyze_tiling(&handle)?))
            }
            Request::QueryExecute { session_id, text } => {
                Ok(Response::Query(self.execute_query(&session_id, &text)?))
            }
            Request::SceneEncode { target, view } => {
                let scene = match target {
                    SceneTarget::Tiling { handle } => {
                        self.encode_tiling_scene(&handle, &view)?
                    }
                    SceneTarget::Shape {
                        kind,
                        dimension,
                        parameters,
                    } => self.encode_shape_scene(kind, dimension, &parameters, &view)?,
                };
                Ok(Response::Scene(scene))
            }
        }
    }

    /// Dispatch a JSON request string.
    ///
    /// Always returns valid JSON: `{"status":"ok","result":...}` or
    /// `{"status":"error","error":...}`, even when serialization of the
    /// error itself fails.
    pub fn dispatch_json(&mut self, request_json: &str) -> String {
        let outcome = serde_json::from_str::<Request>(request_json)
            .map_err(|e| GeometryError::query(format!("Invalid request JSON: {}", e)))
            .and_then(|request| self.dispatch(request));
        let envelope = match outcome {
            Ok(response) => serde_json::json!({
                "status": "ok",
                "result": response,
            }),
            Err(error) => serde_json::json!({
                "status": "error",
                "error": error,
            }),
        };
        serde_json::to_string(&envelope).unwrap_or_else(|_| {
            r#"{"status":"error","error":{"kind":"Internal","message":"Failed to serialize response"}}"#
                .to_string()
        })
    }

    /// Kernel version record.
    pub fn version(&self) -> String {
        serde_json::json!({
            "name": "hypershape-kernel",
            "version": env!("CARGO_PKG_VERSION"),
            "shapes": ["sphere", "cube", "ellipsoid", "simplex", "pyramid"],
            "tilings": ["square", "triangular", "circle-pack", "hexagonal", "voronoi"],
        })
        .to_string()
    }

    pub fn budgets(&self) -> Budgets {
        self.budgets
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Drop all cached tilings.
    pub fn clear_tilings(&mut self) {
        self.tilings.clear();
    }

    pub fn tiling_cache_size(&self) -> usize {
        self.tilings.len()
    }
}

impl Default for GeometryKernel {
    fn default() -> Self {
        Self::new()
    }
}
