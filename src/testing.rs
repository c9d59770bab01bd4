//! Shared fixtures for unit tests.

use crate::models::{Instance, InstanceData};

/// The 8-node, 6-vehicle delivery instance with weight and volume dimensions.
pub(crate) fn fleet_data() -> InstanceData {
    InstanceData::new(
        vec![
            vec![
                0.0, 68.262, 58.493, 234.233, 157.275, 230.117, 656.132, 108.679,
            ],
            vec![
                68.262, 0.0, 24.302, 166.294, 95.279, 162.127, 703.504, 68.121,
            ],
            vec![
                58.493, 24.302, 0.0, 178.583, 98.81, 174.631, 679.801, 55.353,
            ],
            vec![
                234.233, 166.294, 178.583, 0.0, 90.373, 4.425, 819.063, 153.952,
            ],
            vec![157.275, 95.279, 98.81, 90.373, 0.0, 87.391, 731.915, 63.876],
            vec![
                230.117, 162.127, 174.631, 4.425, 87.391, 0.0, 816.933, 150.779,
            ],
            vec![
                656.132, 703.504, 679.801, 819.063, 731.915, 816.933, 0.0, 673.805,
            ],
            vec![
                108.679, 68.121, 55.353, 153.952, 63.876, 150.779, 673.805, 0.0,
            ],
        ],
        6,
    )
    .with_dimension(
        "weights",
        vec![0.0, 0.147, 0.050, 0.225, 0.037, 0.076, 0.258, 0.068],
        vec![5500.0, 5000.0, 4500.0, 3500.0, 1200.0, 600.0],
    )
    .with_dimension(
        "volumes",
        vec![
            0.0, 270.175, 88.474, 567.91, 59.511, 123.723, 544.0, 149.786,
        ],
        vec![777.0, 706.0, 635.0, 425.0, 265.0, 106.0],
    )
    .with_fixed_costs(vec![10000.0, 14000.0, 16000.0, 20000.0, 25000.0, 40000.0])
    .with_per_km_costs(vec![37.3333, 25.6667, 29.1667, 15.1667, 22.1667, 32.6667])
}

pub(crate) fn fleet_instance() -> Instance {
    Instance::new(&fleet_data()).expect("fleet instance is valid")
}

/// Customers on a line east of the depot, one generous vehicle, unit costs.
pub(crate) fn line_instance(customers: usize, vehicles: usize, capacity: f64) -> Instance {
    let n = customers + 1;
    let matrix = (0..n)
        .map(|i| (0..n).map(|j| (i as f64 - j as f64).abs()).collect())
        .collect();
    let mut demands = vec![1.0; n];
    demands[0] = 0.0;
    let data = InstanceData::new(matrix, vehicles).with_dimension(
        "load",
        demands,
        vec![capacity; vehicles],
    );
    Instance::new(&data).expect("line instance is valid")
}
