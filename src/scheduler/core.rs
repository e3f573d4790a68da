use anyhow::Result;
use k8s_openapi::api::core::v1::{Binding, Node, Pod};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{api::PostParams, Api, Client, ResourceExt};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::postbind;
use super::scoring::{score_node, CycleState};
use crate::grid::api::GridTelemetryApi;
use crate::grid::types::{GridSchedulerConfig, GridSnapshot};

pub struct Scheduler {
    client: Client,
    scheduler_name: String,
    config: GridSchedulerConfig,
    api: GridTelemetryApi,
}

impl Scheduler {
    pub fn new(
        client: Client,
        scheduler_name: String,
        config: GridSchedulerConfig,
    ) -> crate::Result<Self> {
        let api = GridTelemetryApi::new(&config.telemetry_url, config.fetch_timeout)?;

        Ok(Self {
            client,
            scheduler_name,
            config,
            api,
        })
    }

    pub async fn run(&self) -> Result<()> {
        info!("Starting scheduler: {}", self.scheduler_name);

        loop {
            if let Err(e) = self.schedule_one_cycle().await {
                error!("Error in scheduler cycle: {}", e);
            }
            sleep(self.config.cycle_interval).await;
        }
    }

    async fn schedule_one_cycle(&self) -> Result<()> {
        let pods: Api<Pod> = Api::all(self.client.clone());
        let nodes: Api<Node> = Api::all(self.client.clone());

        // List all pods and filter for our scheduler and unscheduled
        let all_pods = pods.list(&kube::api::ListParams::default()).await?;

        let mut pending = Vec::new();
        for p in all_pods {
            let spec = match &p.spec {
                Some(s) => s,
                None => continue,
            };

            if spec.scheduler_name.as_deref() == Some(&self.scheduler_name)
                && spec.node_name.is_none()
            {
                pending.push(p);
            }
        }

        if pending.is_empty() {
            return Ok(());
        }

        info!("Found {} unscheduled pods", pending.len());

        let node_list = nodes.list(&kube::api::ListParams::default()).await?;
        let nodes_vec = node_list.items;

        for pod in pending {
            self.schedule_pod(&pod, &nodes_vec).await?;
        }

        Ok(())
    }

    async fn schedule_pod(&self, pod: &Pod, nodes: &[Node]) -> Result<()> {
        let pod_name = pod.name_any();
        info!("Attempting to schedule pod: {}", pod_name);

        let candidates = self.filter_nodes(pod, nodes);
        if candidates.is_empty() {
            warn!("No suitable nodes found for pod {}", pod_name);
            return Ok(());
        }

        // One telemetry fetch per cycle, shared by every candidate score.
        // Telemetry unavailability degrades to fallback scoring and never
        // blocks placement.
        let grid = match self.api.fetch_records().await {
            Ok(records) => Some(GridSnapshot::new(records)),
            Err(e) => {
                warn!(
                    "Grid telemetry unavailable, falling back to neutral scoring: {}",
                    e
                );
                None
            }
        };

        if let Some(snapshot) = &grid {
            debug!("Using telemetry snapshot fetched at {}", snapshot.fetched_at);
        }

        let state = CycleState::pre_score(&pod_name, grid);

        let mut best: Option<(&Node, i64)> = None;
        for node in &candidates {
            let score = score_node(&state, &self.config, node);
            debug!("Node {} scored {} for pod {}", node.name_any(), score, pod_name);

            // First candidate wins ties, keeping the choice deterministic
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((node, score));
            }
        }

        if let Some((node, score)) = best {
            info!(
                "Binding pod {} to node {} (score {})",
                pod_name,
                node.name_any(),
                score
            );
            self.bind_pod(pod, node).await?;
            postbind::notify_bound(self.config.notify_url.clone(), node.name_any());
        }

        Ok(())
    }

    fn filter_nodes<'a>(&self, _pod: &Pod, nodes: &'a [Node]) -> Vec<&'a Node> {
        // Return all schedulable nodes; resource-based filtering stays with
        // the default scheduler profile
        nodes
            .iter()
            .filter(|n| {
                if let Some(spec) = &n.spec {
                    if spec.unschedulable == Some(true) {
                        return false;
                    }
                }
                true
            })
            .collect()
    }

    async fn bind_pod(&self, pod: &Pod, node: &Node) -> Result<()> {
        let namespace = pod.namespace().unwrap_or_else(|| "default".into());
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), &namespace);
        let pod_name = pod.name_any();
        let node_name = node.name_any();

        let binding = Binding {
            metadata: ObjectMeta {
                name: Some(pod_name.clone()),
                namespace: Some(namespace.clone()),
                ..ObjectMeta::default()
            },
            target: k8s_openapi::api::core::v1::ObjectReference {
                api_version: Some("v1".into()),
                kind: Some("Node".into()),
                name: Some(node_name.clone()),
                ..Default::default()
            },
        };

        // Serialize the binding to JSON bytes
        let binding_bytes = serde_json::to_vec(&binding)?;

        // Create binding subresource
        let pp = PostParams::default();
        let _: Binding = pods
            .create_subresource("binding", &pod_name, &pp, binding_bytes)
            .await?;

        info!("Successfully bound {} to {}", pod_name, node_name);
        Ok(())
    }
}
