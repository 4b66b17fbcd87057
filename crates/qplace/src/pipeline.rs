//! The staged placement pipeline.
//!
//! Stages run in a fixed order:
//!
//! ```text
//! build_netlist → compute_weights → build_connectivity → build_system
//!   → build_rhs(x) → build_rhs(y) → solve(x) → solve(y) → emit
//! ```
//!
//! Each stage method checks that its predecessor has produced output and
//! returns [`PlaceError::StageOrder`] otherwise, so the y axis is only built
//! and solved after the x axis. Re-running a stage discards everything
//! downstream of it. [`PlacementPipeline::run`] drives the whole
//! sequence.

use crate::connectivity::ConnectivityMatrix;
use crate::error::{PlaceError, PlaceResult};
use crate::netlist::Netlist;
use crate::placement::Placement;
use crate::record::PlacementInput;
use crate::rhs::{build_rhs, Axis};
use crate::solver::LinearSolver;
use crate::system::SystemMatrix;
use crate::weights::NetWeights;
use nalgebra::DVector;
use qplace_config::PlacerConfig;
use qplace_diagnostics::DiagnosticSink;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Records → [`Netlist`].
    BuildNetlist,
    /// Netlist → [`NetWeights`].
    ComputeWeights,
    /// Netlist + weights → connectivity matrix `C`.
    BuildConnectivity,
    /// `C` + pin anchors → system matrix `A`.
    BuildSystem,
    /// Pin coordinates → right-hand side `b` for one axis.
    BuildRhs(Axis),
    /// `A·x = b` for one axis.
    Solve(Axis),
    /// Per-axis solutions → [`Placement`].
    Emit,
}

impl Stage {
    /// The stage's method name.
    pub fn name(self) -> &'static str {
        match self {
            Stage::BuildNetlist => "build_netlist",
            Stage::ComputeWeights => "compute_weights",
            Stage::BuildConnectivity => "build_connectivity",
            Stage::BuildSystem => "build_system",
            Stage::BuildRhs(Axis::X) => "build_rhs(x)",
            Stage::BuildRhs(Axis::Y) => "build_rhs(y)",
            Stage::Solve(Axis::X) => "solve(x)",
            Stage::Solve(Axis::Y) => "solve(y)",
            Stage::Emit => "emit",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owns the input, the configuration, and every stage's output.
#[derive(Debug)]
pub struct PlacementPipeline<'a> {
    input: PlacementInput,
    config: PlacerConfig,
    sink: &'a DiagnosticSink,
    netlist: Option<Netlist>,
    weights: Option<NetWeights>,
    connectivity: Option<ConnectivityMatrix>,
    system: Option<SystemMatrix>,
    rhs: [Option<DVector<f64>>; 2],
    solver: Option<LinearSolver>,
    solution: [Option<DVector<f64>>; 2],
}

impl<'a> PlacementPipeline<'a> {
    /// Creates a pipeline; no stage has run yet.
    pub fn new(input: PlacementInput, config: PlacerConfig, sink: &'a DiagnosticSink) -> Self {
        PlacementPipeline {
            input,
            config,
            sink,
            netlist: None,
            weights: None,
            connectivity: None,
            system: None,
            rhs: [None, None],
            solver: None,
            solution: [None, None],
        }
    }

    /// Creates a pipeline configured from `<dir>/qplace.toml`.
    pub fn from_config_dir(
        input: PlacementInput,
        dir: &Path,
        sink: &'a DiagnosticSink,
    ) -> PlaceResult<Self> {
        let config = qplace_config::load_config(dir)?;
        Ok(Self::new(input, config, sink))
    }

    /// The configuration in use.
    pub fn config(&self) -> &PlacerConfig {
        &self.config
    }

    /// The netlist, once built.
    pub fn netlist(&self) -> Option<&Netlist> {
        self.netlist.as_ref()
    }

    /// The net weights, once computed.
    pub fn weights(&self) -> Option<&NetWeights> {
        self.weights.as_ref()
    }

    /// The connectivity matrix, once built.
    pub fn connectivity(&self) -> Option<&ConnectivityMatrix> {
        self.connectivity.as_ref()
    }

    /// The system matrix, once built.
    pub fn system(&self) -> Option<&SystemMatrix> {
        self.system.as_ref()
    }

    /// The right-hand side for `axis`, once built.
    pub fn rhs(&self, axis: Axis) -> Option<&DVector<f64>> {
        self.rhs[axis.index()].as_ref()
    }

    /// The solved coordinates for `axis`, once solved.
    pub fn solution(&self, axis: Axis) -> Option<&DVector<f64>> {
        self.solution[axis.index()].as_ref()
    }

    /// Validates the records and builds the netlist.
    pub fn build_netlist(&mut self) -> PlaceResult<&Netlist> {
        self.invalidate_from(Stage::BuildNetlist);
        let netlist = Netlist::from_input(&self.input, &self.config.netlist, self.sink)?;
        Ok(self.netlist.insert(netlist))
    }

    /// Computes the clique weight of every net.
    pub fn compute_weights(&mut self) -> PlaceResult<&NetWeights> {
        self.invalidate_from(Stage::ComputeWeights);
        let netlist = require(&self.netlist, Stage::ComputeWeights, Stage::BuildNetlist)?;
        let weights = NetWeights::compute(netlist, self.config.execution.parallel);
        Ok(self.weights.insert(weights))
    }

    /// Builds the gate connectivity matrix `C`.
    pub fn build_connectivity(&mut self) -> PlaceResult<&ConnectivityMatrix> {
        self.invalidate_from(Stage::BuildConnectivity);
        let netlist = require(&self.netlist, Stage::BuildConnectivity, Stage::BuildNetlist)?;
        let weights = require(&self.weights, Stage::BuildConnectivity, Stage::ComputeWeights)?;
        let c = ConnectivityMatrix::build(netlist, weights, self.config.execution.parallel);
        Ok(self.connectivity.insert(c))
    }

    /// Builds the anchored system matrix `A`.
    pub fn build_system(&mut self) -> PlaceResult<&SystemMatrix> {
        self.invalidate_from(Stage::BuildSystem);
        let c = require(&self.connectivity, Stage::BuildSystem, Stage::BuildConnectivity)?;
        let (netlist, weights) = self.model(Stage::BuildSystem)?;
        let a = SystemMatrix::build(c, netlist, weights, self.config.anchors.weighting);
        Ok(self.system.insert(a))
    }

    /// Builds `b` for one axis. The y axis requires the x axis first.
    pub fn build_rhs(&mut self, axis: Axis) -> PlaceResult<&DVector<f64>> {
        let stage = Stage::BuildRhs(axis);
        self.invalidate_from(stage);
        require(&self.system, stage, Stage::BuildSystem)?;
        if axis == Axis::Y {
            require(&self.rhs[Axis::X.index()], stage, Stage::BuildRhs(Axis::X))?;
        }
        let (netlist, weights) = self.model(stage)?;
        let b = build_rhs(netlist, weights, self.config.anchors.weighting, axis);
        Ok(self.rhs[axis.index()].insert(b))
    }

    /// Solves `A·x = b` for one axis.
    ///
    /// Requires the right-hand side of both axes, and the y solve requires
    /// the x solve. The first call checks `A` for unanchored gates and
    /// prepares the solver; later calls reuse it.
    pub fn solve(&mut self, axis: Axis) -> PlaceResult<&DVector<f64>> {
        let stage = Stage::Solve(axis);
        self.invalidate_from(stage);
        if axis == Axis::Y {
            require(&self.solution[Axis::X.index()], stage, Stage::Solve(Axis::X))?;
        }
        self.prepare_solver()?;
        let (solver, b) = self.solver_and_rhs(axis)?;
        let x = solver.solve(axis, b, self.sink)?;
        log::debug!(target: "qplace", "solved {axis} axis");
        Ok(self.solution[axis.index()].insert(x))
    }

    /// Collects both axis solutions into the final [`Placement`].
    pub fn emit(&self) -> PlaceResult<Placement> {
        let netlist = require(&self.netlist, Stage::Emit, Stage::BuildNetlist)?;
        let x = require(&self.solution[0], Stage::Emit, Stage::Solve(Axis::X))?;
        let y = require(&self.solution[1], Stage::Emit, Stage::Solve(Axis::Y))?;
        Placement::from_solution(netlist, x, y)
    }

    /// Runs every stage in order and returns the placement.
    ///
    /// With `execution.parallel` set, the two axis solves run concurrently.
    pub fn run(mut self) -> PlaceResult<Placement> {
        let netlist = self.build_netlist()?;
        log::info!(
            target: "qplace",
            "placing {} gates, {} pins, {} nets",
            netlist.gate_count(),
            netlist.pin_count(),
            netlist.net_count()
        );
        self.compute_weights()?;
        self.build_connectivity()?;
        self.build_system()?;
        for axis in Axis::ALL {
            self.build_rhs(axis)?;
        }

        if self.config.execution.parallel {
            self.prepare_solver()?;
            let (solver, bx) = self.solver_and_rhs(Axis::X)?;
            let (_, by) = self.solver_and_rhs(Axis::Y)?;
            let sink = self.sink;
            let (x, y) = rayon::join(
                || solver.solve(Axis::X, bx, sink),
                || solver.solve(Axis::Y, by, sink),
            );
            self.solution = [Some(x?), Some(y?)];
        } else {
            for axis in Axis::ALL {
                self.solve(axis)?;
            }
        }

        let placement = self.emit()?;
        log::info!(target: "qplace", "placed {} gates", placement.len());
        Ok(placement)
    }

    fn model(&self, stage: Stage) -> PlaceResult<(&Netlist, &NetWeights)> {
        let netlist = require(&self.netlist, stage, Stage::BuildNetlist)?;
        let weights = require(&self.weights, stage, Stage::ComputeWeights)?;
        Ok((netlist, weights))
    }

    fn prepare_solver(&mut self) -> PlaceResult<()> {
        if self.solver.is_some() {
            return Ok(());
        }
        let stage = Stage::Solve(Axis::X);
        for axis in Axis::ALL {
            require(&self.rhs[axis.index()], stage, Stage::BuildRhs(axis))?;
        }
        let system = require(&self.system, stage, Stage::BuildSystem)?;
        self.solver = Some(LinearSolver::new(system, &self.config.solver, self.sink)?);
        Ok(())
    }

    fn solver_and_rhs(&self, axis: Axis) -> PlaceResult<(&LinearSolver, &DVector<f64>)> {
        let stage = Stage::Solve(axis);
        let solver = require(&self.solver, stage, Stage::BuildSystem)?;
        let b = require(&self.rhs[axis.index()], stage, Stage::BuildRhs(axis))?;
        Ok((solver, b))
    }

    fn invalidate_from(&mut self, stage: Stage) {
        if stage <= Stage::BuildNetlist {
            self.netlist = None;
        }
        if stage <= Stage::ComputeWeights {
            self.weights = None;
        }
        if stage <= Stage::BuildConnectivity {
            self.connectivity = None;
        }
        if stage <= Stage::BuildSystem {
            self.system = None;
        }
        if stage <= Stage::BuildRhs(Axis::X) {
            self.rhs[Axis::X.index()] = None;
        }
        if stage <= Stage::BuildRhs(Axis::Y) {
            self.rhs[Axis::Y.index()] = None;
            self.solver = None;
        }
        if stage <= Stage::Solve(Axis::X) {
            self.solution[Axis::X.index()] = None;
        }
        if stage <= Stage::Solve(Axis::Y) {
            self.solution[Axis::Y.index()] = None;
        }
    }
}

fn require<T>(slot: &Option<T>, stage: Stage, requires: Stage) -> PlaceResult<&T> {
    slot.as_ref()
        .ok_or(PlaceError::StageOrder { stage, requires })
}
