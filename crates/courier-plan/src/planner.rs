//! `DeliveryPlanner` — order stops, then compile the plan.

use courier_core::{DeliveryRequest, GeoCoord, PlanRng};
use courier_spatial::{Router, StreetGraph};

use crate::compiler::{DeliveryPlan, PlanCompiler};
use crate::config::{OrderingStrategy, PlannerConfig};
use crate::orderer::{
    KeepOrder, LocalSearch, NearestNeighbor, OrderingReport, StopOrderer, StopOrdererExt,
};
use crate::PlanResult;

/// Everything produced for one planning request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedRoute {
    /// The requests in the order they will be delivered.
    pub requests: Vec<DeliveryRequest>,
    pub ordering: OrderingReport,
    pub plan:     DeliveryPlan,
}

/// Convenience façade over a [`StopOrderer`] and a [`PlanCompiler`].
///
/// # Example
///
/// ```rust,ignore
/// let graph = StreetGraph::from_source(CsvSource::open(path)?)?;
/// let mut planner = DeliveryPlanner::new(&graph, AStarRouter, PlannerConfig::default())?;
/// let planned = planner.plan(&depot, &requests)?;
/// for command in &planned.plan.commands {
///     println!("{command}");
/// }
/// ```
pub struct DeliveryPlanner<'g, R: Router> {
    compiler:   PlanCompiler<'g, R>,
    config:     PlannerConfig,
    rng:        PlanRng,
    plans_made: u64,
}

impl<'g, R: Router> DeliveryPlanner<'g, R> {
    /// Fails with `PlanError::Config` if `config` does not validate.
    pub fn new(graph: &'g StreetGraph, router: R, config: PlannerConfig) -> PlanResult<Self> {
        config.validate()?;
        Ok(Self {
            compiler: PlanCompiler::new(graph, router),
            rng: PlanRng::new(config.seed),
            config,
            plans_made: 0,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn plans_made(&self) -> u64 {
        self.plans_made
    }

    /// Reorder a copy of `requests` with the configured strategy and compile
    /// the round trip from `depot`.  The caller's slice is left untouched.
    pub fn plan(&mut self, depot: &GeoCoord, requests: &[DeliveryRequest]) -> PlanResult<PlannedRoute> {
        let mut ordered = requests.to_vec();
        let mut rng = self.rng.child(self.plans_made);
        self.plans_made += 1;

        let annealing = self.config.annealing;
        let ordering = match self.config.strategy {
            OrderingStrategy::Unchanged => KeepOrder.reorder(depot, &mut ordered, &mut rng),
            OrderingStrategy::NearestNeighbor => {
                NearestNeighbor.reorder(depot, &mut ordered, &mut rng)
            }
            OrderingStrategy::LocalSearch => {
                LocalSearch::new(annealing).reorder(depot, &mut ordered, &mut rng)
            }
            OrderingStrategy::NearestNeighborThenLocalSearch => NearestNeighbor
                .then(LocalSearch::new(annealing))
                .reorder(depot, &mut ordered, &mut rng),
        };

        let plan = self.compiler.compile(depot, &ordered)?;
        log::info!(
            "planned {} deliveries ({:?}): crow {:.2} → {:.2} mi, street {:.2} mi, {} commands",
            ordered.len(),
            self.config.strategy,
            ordering.original_miles,
            ordering.optimized_miles,
            plan.total_miles,
            plan.commands.len()
        );

        Ok(PlannedRoute { requests: ordered, ordering, plan })
    }
}
