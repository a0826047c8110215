// 🖼️ Scene Builder - Positioned graph in, render-ready figure out
//
// The payload serializes to a Plotly-style figure: {"data": [...], "layout": {...}}.
// Trace order is fixed: one line trace per edge, then the node trace, then the
// edge midpoint hover trace. Colors and annotations follow edge order.

use crate::color::{gradient, Rgb};
use crate::config::SceneStyle;
use crate::graph::{AccountNode, NetworkGraph, TransactionEdge};
use crate::layout::{Layout, LayoutKind, NodePosition, Point};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// TRACES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    /// One edge drawn as a curve
    Line,

    /// Visible markers with a text label
    MarkerText,

    /// Transparent markers that only exist to carry hover text
    HoverMarker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub size: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub width: f64,
    pub color: String,
    pub shape: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub kind: TraceKind,

    #[serde(rename = "type")]
    pub trace_type: String,

    pub mode: String,

    /// `None` breaks a line between segments
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hovertext: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textposition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,

    pub opacity: f64,
}

impl Trace {
    fn new(kind: TraceKind, mode: &str) -> Self {
        Trace {
            kind,
            trace_type: "scatter".to_string(),
            mode: mode.to_string(),
            x: Vec::new(),
            y: Vec::new(),
            text: Vec::new(),
            hovertext: Vec::new(),
            textposition: None,
            hoverinfo: None,
            marker: None,
            line: None,
            opacity: 1.0,
        }
    }

    fn push_point(&mut self, p: Point) {
        self.x.push(Some(p.x));
        self.y.push(Some(p.y));
    }

    /// Number of plotted points, not counting line breaks
    pub fn point_count(&self) -> usize {
        self.x.iter().filter(|x| x.is_some()).count()
    }
}

// ============================================================================
// LAYOUT DESCRIPTOR
// ============================================================================

/// Arrow from `(ax, ay)` to `(x, y)`, both in data coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub ax: f64,
    pub ay: f64,
    pub axref: String,
    pub ayref: String,
    pub x: f64,
    pub y: f64,
    pub xref: String,
    pub yref: String,
    pub showarrow: bool,
    pub arrowhead: u8,
    pub arrowsize: f64,
    pub arrowwidth: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub b: u32,
    pub l: u32,
    pub r: u32,
    pub t: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisStyle {
    pub showgrid: bool,
    pub zeroline: bool,
    pub showticklabels: bool,
}

impl AxisStyle {
    pub fn hidden() -> Self {
        AxisStyle {
            showgrid: false,
            zeroline: false,
            showticklabels: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    pub title: String,
    pub showlegend: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,

    pub margin: Margin,
    pub xaxis: AxisStyle,
    pub yaxis: AxisStyle,
    pub height: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clickmode: Option<String>,

    pub annotations: Vec<Annotation>,
}

impl SceneLayout {
    fn new(style: &SceneStyle) -> Self {
        SceneLayout {
            title: style.title.clone(),
            showlegend: false,
            hovermode: None,
            margin: Margin {
                b: style.margin,
                l: style.margin,
                r: style.margin,
                t: style.margin,
            },
            xaxis: AxisStyle::hidden(),
            yaxis: AxisStyle::hidden(),
            height: style.height,
            clickmode: None,
            annotations: Vec::new(),
        }
    }
}

// ============================================================================
// SCENE PAYLOAD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePayload {
    pub data: Vec<Trace>,
    pub layout: SceneLayout,

    /// Engine that placed the nodes; `None` for the isolated-account scene
    #[serde(skip)]
    pub layout_kind: Option<LayoutKind>,
}

/// Counts describing a payload, for logs and the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    pub layout: &'static str,
    pub line_traces: usize,
    pub marker_traces: usize,
    pub node_points: usize,
    pub hover_points: usize,
    pub annotations: usize,
}

impl ScenePayload {
    pub fn traces_of(&self, kind: TraceKind) -> impl Iterator<Item = &Trace> {
        self.data.iter().filter(move |t| t.kind == kind)
    }

    pub fn summary(&self) -> SceneSummary {
        SceneSummary {
            layout: self.layout_kind.map(|k| k.as_str()).unwrap_or("none"),
            line_traces: self.traces_of(TraceKind::Line).count(),
            marker_traces: self.data.iter().filter(|t| t.kind != TraceKind::Line).count(),
            node_points: self
                .traces_of(TraceKind::MarkerText)
                .map(Trace::point_count)
                .sum(),
            hover_points: self
                .traces_of(TraceKind::HoverMarker)
                .map(|t| t.hovertext.len())
                .sum(),
            annotations: self.layout.annotations.len(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        json.context("Failed to serialize scene")
    }
}

// ============================================================================
// SCENE BUILDER
// ============================================================================

pub struct SceneBuilder<'a> {
    style: &'a SceneStyle,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(style: &'a SceneStyle) -> Self {
        SceneBuilder { style }
    }

    fn node_marker(&self) -> Marker {
        Marker {
            size: self.style.node_size,
            color: self.style.node_color.clone(),
        }
    }

    /// Scene for an account with no counterparties in the window.
    ///
    /// A labelled marker plus a transparent twin at the same spot, so the
    /// canvas keeps the same trace indices as a populated scene.
    pub fn isolated(&self, queried: &str) -> ScenePayload {
        let (px, py) = self.style.placeholder;
        let placeholder = Point::new(px, py);

        let mut node_trace = Trace::new(TraceKind::MarkerText, "markers+text");
        node_trace.push_point(placeholder);
        node_trace.text.push(queried.to_string());
        node_trace.textposition = Some("bottom center".to_string());
        node_trace.marker = Some(self.node_marker());

        let mut decoy = Trace::new(TraceKind::HoverMarker, "markers");
        decoy.push_point(placeholder);
        decoy.marker = Some(self.node_marker());
        decoy.opacity = 0.0;

        ScenePayload {
            data: vec![node_trace, decoy],
            layout: SceneLayout::new(self.style),
            layout_kind: None,
        }
    }

    /// `max_amount` is the largest amount in the filtered window; widths are
    /// relative to it.
    pub fn build(
        &self,
        graph: &NetworkGraph,
        layout: &Layout,
        max_amount: f64,
    ) -> Result<ScenePayload> {
        let start = Rgb::parse(&self.style.gradient_start).context("Invalid gradient start color")?;
        let end = Rgb::parse(&self.style.gradient_end).context("Invalid gradient end color")?;
        let colors = gradient(start, end, graph.edge_count());
        let positions = layout.node_positions(graph);

        let mut data = Vec::with_capacity(graph.edge_count() + 2);

        for (edge, color) in graph.edges.iter().zip(&colors) {
            let (from, to) = endpoints(edge, &positions);
            let mut trace = Trace::new(TraceKind::Line, "lines");
            trace.x = vec![Some(from.x), Some(to.x), None];
            trace.y = vec![Some(from.y), Some(to.y), None];
            trace.line = Some(LineStyle {
                width: self.edge_width(edge.transaction.amount, max_amount),
                color: color.to_css(),
                shape: "spline".to_string(),
            });
            data.push(trace);
        }

        let mut node_trace = Trace::new(TraceKind::MarkerText, "markers+text");
        node_trace.textposition = Some("bottom center".to_string());
        node_trace.hoverinfo = Some("text".to_string());
        node_trace.marker = Some(self.node_marker());
        for (position, node) in positions.iter().zip(&graph.nodes) {
            node_trace.push_point(position.point());
            node_trace.text.push(position.node_id.clone());
            node_trace.hovertext.push(node_hover_text(node));
        }
        data.push(node_trace);

        let mut middle_trace = Trace::new(TraceKind::HoverMarker, "markers");
        middle_trace.hoverinfo = Some("text".to_string());
        middle_trace.marker = Some(Marker {
            size: self.style.hover_size,
            color: self.style.node_color.clone(),
        });
        middle_trace.opacity = 0.0;
        for edge in &graph.edges {
            let (from, to) = endpoints(edge, &positions);
            middle_trace.push_point(from.midpoint(to));
            middle_trace.hovertext.push(edge_hover_text(edge));
        }
        data.push(middle_trace);

        let mut scene_layout = SceneLayout::new(self.style);
        scene_layout.hovermode = Some("closest".to_string());
        scene_layout.clickmode = Some("event+select".to_string());
        scene_layout.annotations = graph
            .edges
            .iter()
            .map(|edge| self.arrow(edge, &positions))
            .collect();

        Ok(ScenePayload {
            data,
            layout: scene_layout,
            layout_kind: Some(layout.kind),
        })
    }

    /// Linear in the amount; the largest transaction gets `max_edge_width`
    pub fn edge_width(&self, amount: f64, max_amount: f64) -> f64 {
        if max_amount > 0.0 {
            amount / max_amount * self.style.max_edge_width
        } else {
            0.0
        }
    }

    fn arrow(&self, edge: &TransactionEdge, positions: &[NodePosition]) -> Annotation {
        let (from, to) = endpoints(edge, positions);
        let tail = from.midpoint(to);
        let head = from.three_quarters_to(to);

        Annotation {
            ax: tail.x,
            ay: tail.y,
            axref: "x".to_string(),
            ayref: "y".to_string(),
            x: head.x,
            y: head.y,
            xref: "x".to_string(),
            yref: "y".to_string(),
            showarrow: true,
            arrowhead: self.style.arrow_head,
            arrowsize: self.style.arrow_size,
            arrowwidth: self.style.arrow_width,
            opacity: 1.0,
        }
    }
}

fn endpoints(edge: &TransactionEdge, positions: &[NodePosition]) -> (Point, Point) {
    let at = |index: usize| positions.get(index).map_or(Point::ORIGIN, NodePosition::point);
    (at(edge.source), at(edge.target))
}

const MISSING: &str = "None";

fn node_hover_text(node: &AccountNode) -> String {
    format!(
        "CustomerName: {}<br>AccountType: {}",
        node.customer_name.as_deref().unwrap_or(MISSING),
        node.account_type.as_deref().unwrap_or(MISSING)
    )
}

fn edge_hover_text(edge: &TransactionEdge) -> String {
    let tx = &edge.transaction;
    format!(
        "From: {}<br>To: {}<br>TransactionAmt: {}<br>TransactionDate: {}",
        tx.source,
        tx.target,
        format_amount(tx.amount),
        tx.date
    )
}

/// Whole amounts keep one decimal: `100.0`, `12.5`
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.is_finite() {
        format!("{:.1}", amount)
    } else {
        amount.to_string()
    }
}
