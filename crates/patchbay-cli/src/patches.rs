//! Built-in demo patches driven by the `run` command.
//!
//! Every patch is built through a [`Schema`] from operation tags and reads a
//! single external drive value, so the harness only has to set that value and
//! update the patch once per cycle.

use clap::ValueEnum;
use patchbay_core::ops::Lowpass;
use patchbay_core::{ExternalValue, GraphError, GroupId, GroupPort, NodeId};
use patchbay_registry::{Schema, SchemaError};

use crate::config::HarnessConfig;

/// Demo patch selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PatchKind {
    /// (drive + 2.3) * 2.0 - 1.3, negated
    Arith,
    /// Running sum of the drive
    Integrator,
    /// Stereo lowpass in nested groups (left = drive, right = -drive / 2)
    StereoLowpass,
}

impl PatchKind {
    /// Name as typed on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Arith => "arith",
            Self::Integrator => "integrator",
            Self::StereoLowpass => "stereo-lowpass",
        }
    }
}

/// Where a reported value is read from.
#[derive(Debug, Clone, Copy)]
enum Tap {
    Node(NodeId, usize),
    Group(GroupId, usize),
}

/// A built patch plus the drive it reads and the values it reports.
pub struct Patch {
    schema: Schema,
    drive: ExternalValue,
    target: Tap,
    taps: Vec<(&'static str, Tap)>,
}

impl Patch {
    /// Builds `kind` with the given harness settings.
    pub fn build(kind: PatchKind, config: &HarnessConfig) -> Result<Self, SchemaError> {
        let mut patch = Self {
            schema: Schema::new(),
            drive: ExternalValue::new(0.0),
            target: Tap::Node(NodeId::sentinel(), 0),
            taps: Vec::new(),
        };
        match kind {
            PatchKind::Arith => patch.build_arith()?,
            PatchKind::Integrator => patch.build_integrator()?,
            PatchKind::StereoLowpass => patch.build_stereo_lowpass(config)?,
        }
        tracing::info!(
            patch = kind.name(),
            nodes = patch.schema.graph().node_count(),
            groups = patch.schema.graph().group_count(),
            "patch built"
        );
        Ok(patch)
    }

    /// Labels of the reported values, in report order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.taps.iter().map(|(label, _)| *label).collect()
    }

    /// Sets the drive, runs one update cycle, and returns the reported values.
    pub fn step(&mut self, drive: f32) -> Result<Vec<f32>, SchemaError> {
        self.drive.set(drive);
        let graph = self.schema.graph_mut();
        match self.target {
            Tap::Node(node, _) => graph.update(node)?,
            Tap::Group(group, _) => graph.update_group(group)?,
        }
        Ok(self.taps.iter().map(|&(_, tap)| self.read(tap)).collect())
    }

    fn read(&self, tap: Tap) -> f32 {
        let graph = self.schema.graph();
        match tap {
            Tap::Node(node, ch) => graph.get(node, ch),
            Tap::Group(group, ch) => graph.group_get(group, ch),
        }
        .unwrap_or(0.0)
    }

    fn build_arith(&mut self) -> Result<(), SchemaError> {
        let drive = &self.drive;
        let schema = &mut self.schema;
        let add = schema.new_node("add", |node| {
            node.set_external(0, drive);
            node.set_constant(1, 2.3);
        })?;
        let mul = schema.new_node("multiply", |node| node.set_constant(1, 2.0))?;
        let sub = schema.new_node("subtract", |node| node.set_constant(1, 1.3))?;
        let neg = schema.new_node("negate", |_| {})?;
        schema.connect(add, 0, mul, 0)?;
        schema.connect(mul, 0, sub, 0)?;
        schema.connect(sub, 0, neg, 0)?;

        self.target = Tap::Node(neg, 0);
        self.taps = vec![
            ("add", Tap::Node(add, 0)),
            ("multiply", Tap::Node(mul, 0)),
            ("subtract", Tap::Node(sub, 0)),
            ("negate", Tap::Node(neg, 0)),
        ];
        Ok(())
    }

    fn build_integrator(&mut self) -> Result<(), SchemaError> {
        let drive = &self.drive;
        let acc = self
            .schema
            .new_node("integral", |node| node.set_external(0, drive))?;
        self.target = Tap::Node(acc, 0);
        self.taps = vec![("integral", Tap::Node(acc, 0))];
        Ok(())
    }

    fn build_stereo_lowpass(&mut self, config: &HarnessConfig) -> Result<(), SchemaError> {
        let drive = &self.drive;
        let schema = &mut self.schema;
        let root = schema.root();

        // Right channel is the drive halved and inverted.
        let right = schema.new_node("multiply", |node| {
            node.set_external(0, drive);
            node.set_constant(1, -0.5);
        })?;

        let outer = schema.new_group(root, 4, 2)?;
        let filters = schema.new_group(outer, 4, 2)?;
        let mut lowpasses = [NodeId::sentinel(); 2];
        for lp in &mut lowpasses {
            *lp = schema.new_node_in(filters, "lowpass", |_| {})?;
        }
        let tail = schema.new_node_in(outer, "passthrough", |node| {
            node.set_num_inputs(2);
        })?;

        let graph = schema.graph_mut();
        graph.set_group_constant(outer, 0, config.cutoff)?;
        graph.set_group_constant(outer, 1, config.resonance)?;
        graph.set_group_external(outer, 2, drive)?;
        graph.set_group_input_from_node(outer, 3, right, 0)?;

        for ch in 0..4 {
            graph.set_group_input_from_group(filters, ch, outer, ch, GroupPort::Input)?;
        }
        let filters_in = graph
            .group_input(filters)
            .ok_or(GraphError::GroupNotFound(filters))?;
        let filters_out = graph
            .group_output(filters)
            .ok_or(GraphError::GroupNotFound(filters))?;
        for (out_ch, (&lp, input_ch)) in lowpasses.iter().zip([2, 3]).enumerate() {
            graph.connect(filters_in, 0, lp, Lowpass::CUTOFF)?;
            graph.connect(filters_in, 1, lp, Lowpass::RESONANCE)?;
            graph.connect(filters_in, input_ch, lp, Lowpass::INPUT)?;
            graph.set_group_output(filters, out_ch, lp, 0)?;
        }
        for ch in 0..2 {
            graph.connect(filters_out, ch, tail, ch)?;
            graph.set_group_output(outer, ch, tail, ch)?;
        }

        self.target = Tap::Group(outer, 0);
        self.taps = vec![("left", Tap::Group(outer, 0)), ("right", Tap::Group(outer, 1))];
        Ok(())
    }
}
