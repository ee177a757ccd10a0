//! Circuit Connectivity Graph
//!
//! Bipartite device/net graph built with petgraph. The graph is *derived*
//! from device pin data; a caller-supplied net table is never consulted, so
//! stale or partial net membership in the input cannot corrupt detection.
//!
//! Alongside the graph itself this keeps an ordered net → (device, pin)
//! adjacency index: entries appear in device insertion order, which is what
//! makes the propagation engine deterministic.

use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::HashMap;

use super::schema::{Circuit, DeviceHandle, NetType};

/// Node in the connectivity graph
#[derive(Debug, Clone)]
pub enum GraphNode {
    Device(DeviceHandle),
    Net(String),
}

/// Edge from a device to a net, labelled with the connecting pin name
#[derive(Debug, Clone)]
pub struct PinEdge {
    pub pin: String,
}

/// Derived connectivity view over a [`Circuit`].
#[derive(Debug, Clone)]
pub struct CircuitGraph {
    graph: DiGraph<GraphNode, PinEdge>,
    /// net id -> connected (device, pin name), in device insertion order
    adjacency: HashMap<String, Vec<(DeviceHandle, String)>>,
    /// net ids in first-seen order
    net_order: Vec<String>,
    net_types: HashMap<String, NetType>,
    /// per-device connected net ids, in pin order
    device_nets: Vec<Vec<String>>,
}

impl CircuitGraph {
    /// Build the graph from device pin data.
    pub fn build(circuit: &Circuit) -> Self {
        let mut graph = DiGraph::new();
        let mut net_nodes: HashMap<String, NodeIndex> = HashMap::new();
        let mut adjacency: HashMap<String, Vec<(DeviceHandle, String)>> = HashMap::new();
        let mut net_order = Vec::new();
        let mut net_types = HashMap::new();
        let mut device_nets = Vec::with_capacity(circuit.len());

        for handle in circuit.handles() {
            let device = circuit.device(handle);
            let dev_node = graph.add_node(GraphNode::Device(handle));
            let mut nets = Vec::new();

            for pin in &device.pins {
                let Some(net_id) = pin.net.as_deref() else {
                    continue;
                };
                let net_node = *net_nodes.entry(net_id.to_string()).or_insert_with(|| {
                    net_order.push(net_id.to_string());
                    net_types.insert(net_id.to_string(), NetType::classify(net_id));
                    graph.add_node(GraphNode::Net(net_id.to_string()))
                });
                graph.add_edge(
                    dev_node,
                    net_node,
                    PinEdge {
                        pin: pin.name.clone(),
                    },
                );
                adjacency
                    .entry(net_id.to_string())
                    .or_default()
                    .push((handle, pin.name.clone()));
                nets.push(net_id.to_string());
            }
            device_nets.push(nets);
        }

        Self {
            graph,
            adjacency,
            net_order,
            net_types,
            device_nets,
        }
    }

    /// Connected (device, pin-name) entries for a net, in device insertion
    /// order. Unknown nets yield an empty slice.
    pub fn devices_on_net(&self, net: &str) -> &[(DeviceHandle, String)] {
        self.adjacency.get(net).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Net ids a device connects to, in pin order.
    pub fn nets_for_device(&self, handle: DeviceHandle) -> &[String] {
        self.device_nets
            .get(handle.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Net ids in first-seen order.
    pub fn nets(&self) -> impl Iterator<Item = &str> {
        self.net_order.iter().map(String::as_str)
    }

    pub fn net_type(&self, net: &str) -> Option<NetType> {
        self.net_types.get(net).copied()
    }

    pub fn net_count(&self) -> usize {
        self.net_order.len()
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Weakly connected components of the device/net graph. Isolated devices
    /// (no connected pins) each count as their own component.
    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    pub fn stats(&self, circuit: &Circuit) -> CircuitStats {
        let mos_count = circuit.devices().filter(|d| d.kind.is_mos()).count();
        let passive_count = circuit.devices().filter(|d| d.kind.is_passive()).count();
        let power_net_count = self
            .net_types
            .values()
            .filter(|t| matches!(t, NetType::Power | NetType::Ground))
            .count();

        CircuitStats {
            device_count: circuit.len(),
            mos_count,
            passive_count,
            net_count: self.net_count(),
            connection_count: self.connection_count(),
            power_net_count,
            graph_components: self.component_count(),
        }
    }

    /// Advisory connectivity checks: unconnected pins, degenerate nets,
    /// floating transistors. Never fatal; surfaced by the CLI `stats` command.
    pub fn validate_connections(&self, circuit: &Circuit) -> Vec<ConnectivityIssue> {
        let mut issues = Vec::new();

        for handle in circuit.handles() {
            let device = circuit.device(handle);
            for pin in &device.pins {
                if pin.net.is_none() {
                    issues.push(ConnectivityIssue {
                        message: format!("Pin {}.{} is not connected", device.id, pin.name),
                        device: Some(device.id.clone()),
                        net: None,
                    });
                }
            }
        }

        for net in &self.net_order {
            if self.devices_on_net(net).len() == 1 {
                issues.push(ConnectivityIssue {
                    message: format!("Net {} has only one connection", net),
                    device: None,
                    net: Some(net.clone()),
                });
            }
        }

        for handle in circuit.handles() {
            let device = circuit.device(handle);
            if !device.kind.is_mos() {
                continue;
            }
            let has_rail = self.nets_for_device(handle).iter().any(|n| {
                matches!(
                    self.net_type(n),
                    Some(NetType::Power) | Some(NetType::Ground)
                )
            });
            if !has_rail {
                issues.push(ConnectivityIssue {
                    message: format!("Device {} has no power/ground connection", device.id),
                    device: Some(device.id.clone()),
                    net: None,
                });
            }
        }

        issues
    }
}

/// Advisory finding from connectivity validation
#[derive(Debug, Clone, Serialize)]
pub struct ConnectivityIssue {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<String>,
}

/// Summary counters over a circuit and its derived graph
#[derive(Debug, Clone, Serialize)]
pub struct CircuitStats {
    pub device_count: usize,
    pub mos_count: usize,
    pub passive_count: usize,
    pub net_count: usize,
    pub connection_count: usize,
    pub power_net_count: usize,
    pub graph_components: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::schema::{Device, DeviceParams, DeviceType, Pin};

    fn two_device_circuit() -> Circuit {
        let mut circuit = Circuit::new("test");
        circuit.add_device(
            Device::new("M1", DeviceType::Nmos)
                .with_params(DeviceParams::new().with_w(1e-6))
                .with_pin(Pin::new("d").with_net("OUT"))
                .with_pin(Pin::new("g").with_net("IN"))
                .with_pin(Pin::new("s").with_net("VSS")),
        );
        circuit.add_device(
            Device::new("R1", DeviceType::Resistor)
                .with_pin(Pin::new("a").with_net("OUT"))
                .with_pin(Pin::new("b").with_net("VDD")),
        );
        circuit
    }

    #[test]
    fn test_adjacency_order() {
        let circuit = two_device_circuit();
        let graph = CircuitGraph::build(&circuit);

        let on_out = graph.devices_on_net("OUT");
        assert_eq!(on_out.len(), 2);
        // device insertion order: M1 first, then R1
        assert_eq!(circuit.device(on_out[0].0).id, "M1");
        assert_eq!(on_out[0].1, "d");
        assert_eq!(circuit.device(on_out[1].0).id, "R1");
    }

    #[test]
    fn test_unknown_net_is_empty() {
        let circuit = two_device_circuit();
        let graph = CircuitGraph::build(&circuit);
        assert!(graph.devices_on_net("NOPE").is_empty());
    }

    #[test]
    fn test_stats_and_components() {
        let circuit = two_device_circuit();
        let graph = CircuitGraph::build(&circuit);
        let stats = graph.stats(&circuit);

        assert_eq!(stats.device_count, 2);
        assert_eq!(stats.mos_count, 1);
        assert_eq!(stats.net_count, 4);
        assert_eq!(stats.connection_count, 5);
        // everything hangs together through OUT
        assert_eq!(stats.graph_components, 1);
    }

    #[test]
    fn test_validate_connections_flags_single_pin_nets() {
        let circuit = two_device_circuit();
        let graph = CircuitGraph::build(&circuit);
        let issues = graph.validate_connections(&circuit);

        // IN, VSS, VDD each have a single connection
        let single: Vec<_> = issues
            .iter()
            .filter(|i| i.message.contains("only one connection"))
            .collect();
        assert_eq!(single.len(), 3);
    }
}
