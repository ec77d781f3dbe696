use netreach_core::{
    build_reachable_edges, compute_bounds, reachable_from_index, GraphIndex, NetworkEdge,
    NetworkGraph, NetworkNode, ReachabilityOptions,
};
use std::collections::VecDeque;
use std::time::Instant;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(200_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: netreach-bench [mode] [node_count]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  grid        Street grid with uniform block lengths");
        println!("  geometric   Random points linked to nearby points (road-like)");
        println!("  smallworld  Ring of towns with random long-distance links");
        println!("  barbell     Two dense cities joined by a thin corridor");
        println!("  tree        Branching distribution network from a single depot");
        println!();
        println!("Default node_count: 200000");
        return;
    }

    println!("netreach-bench");
    println!("==============");
    println!();

    let generators: Vec<(&str, fn(u64) -> NetworkGraph)> = match mode {
        "grid" => vec![("Street grid", gen_grid)],
        "geometric" => vec![("Random geometric", gen_geometric)],
        "smallworld" => vec![("Small-world ring", gen_small_world)],
        "barbell" => vec![("Barbell (city-corridor-city)", gen_barbell)],
        "tree" => vec![("Distribution tree", gen_tree)],
        "all" => vec![
            ("Street grid", gen_grid as fn(u64) -> NetworkGraph),
            ("Random geometric", gen_geometric),
            ("Small-world ring", gen_small_world),
            ("Barbell (city-corridor-city)", gen_barbell),
            ("Distribution tree", gen_tree),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count);
    }
}

fn run_benchmark(name: &str, generator: fn(u64) -> NetworkGraph, node_count: u64) {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let graph = generator(node_count);
    let gen_time = t.elapsed();
    println!(
        "Generated in {:.2}s: {} nodes, {} edges",
        gen_time.as_secs_f64(),
        graph.node_count(),
        graph.edge_count(),
    );

    let t = Instant::now();
    let index = GraphIndex::build(&graph);
    println!(
        "Indexed in {:.1}ms ({} edges dropped)",
        t.elapsed().as_secs_f64() * 1000.0,
        index.dropped_edges()
    );

    // Budgets in km of network distance from node 0
    println!();
    println!(
        "{:>8} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "budget", "reached", "stale", "peak", "solve", "project"
    );
    println!(
        "{:->8} {:->10} {:->10} {:->10} {:->10} {:->10}",
        "", "", "", "", "", ""
    );

    let Some(origin) = graph.nodes.first().map(|n| n.id.clone()) else {
        println!("(empty graph, nothing to measure)");
        println!();
        return;
    };
    for budget in [1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 500.0] {
        let options = ReachabilityOptions::new(origin.clone(), budget);

        let t = Instant::now();
        let outcome = match reachable_from_index(&index, &options, None) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("{}: {}", name, e);
                return;
            }
        };
        let solve = t.elapsed();

        let t = Instant::now();
        let edges = build_reachable_edges(&graph, &outcome.nodes);
        let bounds = compute_bounds(outcome.nodes.iter().map(|r| r.node));
        let project = t.elapsed();
        std::hint::black_box((&edges, &bounds));

        println!(
            "{:>8} {:>10} {:>10} {:>10} {:>8.1}ms {:>8.1}ms",
            budget,
            outcome.nodes.len(),
            outcome.stats.stale_entries_skipped,
            outcome.stats.frontier_peak,
            solve.as_secs_f64() * 1000.0,
            project.as_secs_f64() * 1000.0
        );
        // Stop if we already found everything
        if outcome.nodes.len() >= index.node_count() {
            println!("{:>8} (entire graph reached)", "");
            break;
        }
    }
    println!();
}

// ---------------------------------------------------------------------------
// Generators: O(n) or O(n + edges), single-threaded, deterministic.
// Coordinates are lon/lat around a fixed anchor; weights are km.
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

const ANCHOR: [f64; 2] = [-122.4194, 37.7749];
const KM_PER_DEG_LAT: f64 = 111.32;

/// Equirectangular distance in km; accurate enough at city scale.
fn distance_km(a: [f64; 2], b: [f64; 2]) -> f64 {
    let mean_lat = ((a[1] + b[1]) / 2.0).to_radians();
    let dx = (b[0] - a[0]) * KM_PER_DEG_LAT * mean_lat.cos();
    let dy = (b[1] - a[1]) * KM_PER_DEG_LAT;
    (dx * dx + dy * dy).sqrt()
}

/// Offset from the anchor by (east, north) km.
fn offset_km(east: f64, north: f64) -> [f64; 2] {
    [
        ANCHOR[0] + east / (KM_PER_DEG_LAT * ANCHOR[1].to_radians().cos()),
        ANCHOR[1] + north / KM_PER_DEG_LAT,
    ]
}

fn push_node(graph: &mut NetworkGraph, id: u64, coordinates: [f64; 2]) {
    graph.nodes.push(NetworkNode::new(format!("n{}", id), coordinates));
}

fn push_edge(graph: &mut NetworkGraph, from: u64, to: u64) {
    let weight = distance_km(
        graph.nodes[from as usize].coordinates,
        graph.nodes[to as usize].coordinates,
    );
    let id = graph.edges.len();
    graph.edges.push(NetworkEdge::new(
        format!("e{}", id),
        format!("n{}", from),
        format!("n{}", to),
        weight,
    ));
}

fn with_capacity(node_count: u64, edge_count: u64) -> NetworkGraph {
    NetworkGraph::new(
        Vec::with_capacity(node_count as usize),
        Vec::with_capacity(edge_count as usize),
    )
}

/// Street grid: square lattice with 200m blocks.
///
/// Uniform weights give huge equal-cost tie runs; stresses frontier ordering.
fn gen_grid(node_count: u64) -> NetworkGraph {
    let side = (node_count as f64).sqrt().ceil().max(1.0) as u64;
    let mut graph = with_capacity(node_count, node_count * 2);
    let block = 0.2;

    for id in 0..node_count {
        let (row, col) = (id / side, id % side);
        push_node(&mut graph, id, offset_km(col as f64 * block, row as f64 * block));
    }
    for id in 0..node_count {
        if id % side + 1 < side && id + 1 < node_count {
            push_edge(&mut graph, id, id + 1);
        }
        if id + side < node_count {
            push_edge(&mut graph, id, id + side);
        }
    }

    graph
}

/// Random geometric: points scattered over a square, sorted into strips,
/// each linked to a few points close to it in strip order.
///
/// Irregular weights; the closest thing here to a real road network.
fn gen_geometric(node_count: u64) -> NetworkGraph {
    let links = 4u64;
    let mut graph = with_capacity(node_count, node_count * links);
    let mut rng = FastRng::new(12345);
    let extent_km = (node_count as f64).sqrt() * 0.25;

    let mut points: Vec<[f64; 2]> = (0..node_count)
        .map(|_| [rng.next_f64() * extent_km, rng.next_f64() * extent_km])
        .collect();
    // strip-major order so neighbors in the list are neighbors on the map
    let strip = 0.5;
    points.sort_by(|a, b| {
        let (sa, sb) = ((a[1] / strip) as i64, (b[1] / strip) as i64);
        sa.cmp(&sb).then(a[0].total_cmp(&b[0]))
    });
    for (id, p) in points.iter().enumerate() {
        push_node(&mut graph, id as u64, offset_km(p[0], p[1]));
    }
    for id in 0..node_count {
        for _ in 0..links {
            let jump = 1 + rng.next(16);
            if id + jump < node_count {
                push_edge(&mut graph, id, id + jump);
            }
        }
    }

    graph
}

/// Small-world: towns on a 50km ring linked to K neighbors each side,
/// with occasional long-distance links across the ring.
fn gen_small_world(node_count: u64) -> NetworkGraph {
    let k = 3u64;
    let p = 0.05f64;
    let radius = 50.0;
    let mut graph = with_capacity(node_count, node_count * k);
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        let theta = i as f64 / node_count as f64 * std::f64::consts::TAU;
        push_node(&mut graph, i, offset_km(radius * theta.cos(), radius * theta.sin()));
    }
    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = (i + j) % node_count;
            if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                push_edge(&mut graph, i, if rewired != i { rewired } else { neighbor });
            } else if neighbor != i {
                push_edge(&mut graph, i, neighbor);
            }
        }
    }

    graph
}

/// Barbell: two dense cities 40km apart, connected by a corridor of
/// relay nodes. Budget growth stalls at the corridor, then jumps.
fn gen_barbell(node_count: u64) -> NetworkGraph {
    let bridge_len = 20u64;
    let city_size = node_count.saturating_sub(bridge_len).max(2) / 2;
    let mut graph = with_capacity(city_size * 2 + bridge_len, city_size * 12 + bridge_len);
    let mut rng = FastRng::new(99999);
    let city_km = (city_size as f64).sqrt() * 0.1;

    // City A: nodes 0..city_size
    for i in 0..city_size {
        push_node(&mut graph, i, offset_km(rng.next_f64() * city_km, rng.next_f64() * city_km));
    }
    for i in 0..city_size {
        for _ in 0..6u64.min(city_size - 1) {
            let target = rng.next(city_size);
            if target != i {
                push_edge(&mut graph, i, target);
            }
        }
    }

    // Corridor from the last node of A towards B
    let bridge_start = city_size;
    for i in 0..bridge_len {
        let id = bridge_start + i;
        let along = city_km + 40.0 * (i + 1) as f64 / (bridge_len + 1) as f64;
        push_node(&mut graph, id, offset_km(along, city_km / 2.0));
        push_edge(&mut graph, if i == 0 { city_size - 1 } else { id - 1 }, id);
    }

    // City B: nodes after the corridor
    let b_start = bridge_start + bridge_len;
    for i in 0..city_size {
        let east = city_km + 40.0 + rng.next_f64() * city_km;
        push_node(&mut graph, b_start + i, offset_km(east, rng.next_f64() * city_km));
    }
    push_edge(&mut graph, b_start - 1, b_start);
    for i in 0..city_size {
        for _ in 0..6u64.min(city_size - 1) {
            let target = rng.next(city_size);
            if target != i {
                push_edge(&mut graph, b_start + i, b_start + target);
            }
        }
    }

    graph
}

/// Distribution tree: a depot feeding three branches per node, each hop
/// shorter than the last. Deep paths; tests path reconstruction.
fn gen_tree(node_count: u64) -> NetworkGraph {
    let branching = 3u64;
    let mut graph = with_capacity(node_count, node_count);
    let mut rng = FastRng::new(42);

    push_node(&mut graph, 0, ANCHOR);

    let mut next_id: u64 = 1;
    // (node, east_km, north_km, hop_km)
    let mut frontier: VecDeque<(u64, f64, f64, f64)> = VecDeque::new();
    frontier.push_back((0, 0.0, 0.0, 8.0));

    while next_id < node_count {
        let Some((parent, east, north, hop)) = frontier.pop_front() else {
            break;
        };
        for _ in 0..branching {
            if next_id >= node_count {
                break;
            }
            let theta = rng.next_f64() * std::f64::consts::TAU;
            let (ce, cn) = (east + hop * theta.cos(), north + hop * theta.sin());
            push_node(&mut graph, next_id, offset_km(ce, cn));
            push_edge(&mut graph, parent, next_id);
            frontier.push_back((next_id, ce, cn, (hop * 0.7).max(0.05)));
            next_id += 1;
        }
    }

    graph
}
