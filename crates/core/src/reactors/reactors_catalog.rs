//! Default reactor catalog provisioned at start-up.

use rust_decimal_macros::dec;

use super::reactors_model::NewReactor;

/// Returns the five reactors offered by the demo platform.
pub fn default_catalog() -> Vec<NewReactor> {
    vec![
        NewReactor {
            slug: "nuwave".to_string(),
            name: "NuWave".to_string(),
            reactor_type: "Advanced Pressurized Water Small Modular Reactor (SMR)".to_string(),
            description: "Factory-fabricated light water SMR with passive safety, underground \
                installation and a sealed 20-year core. Optional desalination and hydrogen \
                co-generation."
                .to_string(),
            location: "Pacific Northwest, USA".to_string(),
            image_url: Some("https://example.com/nuwave.jpg".to_string()),
            display_order: 1,
            annual_roi_rate: dec!(0.0450),
            carbon_offset_rate: dec!(0.8500),
            total_funding_needed: dec!(180000),
            is_active: true,
        },
        NewReactor {
            slug: "phoenix_regenx7".to_string(),
            name: "Phoenix RegenX-7".to_string(),
            reactor_type: "Next-Gen Molten Salt Reactor (MSR)".to_string(),
            description: "Fluoride-based molten salt reactor running liquid thorium fuel at \
                atmospheric pressure, with online fission product removal and near-zero \
                long-lived waste."
                .to_string(),
            location: "La Drôme Nucléaire, France".to_string(),
            image_url: Some("https://example.com/phoenix.jpg".to_string()),
            display_order: 2,
            annual_roi_rate: dec!(0.0680),
            carbon_offset_rate: dec!(1.1500),
            total_funding_needed: dec!(150000),
            is_active: true,
        },
        NewReactor {
            slug: "nexus_core".to_string(),
            name: "Nexus CORE".to_string(),
            reactor_type: "Cognitive Optimized High-Temperature Gas-Cooled Reactor (HTGR)"
                .to_string(),
            description: "Helium-cooled pebble-bed reactor on TRISO fuel delivering high outlet \
                temperatures for industrial heat, hydrogen production and power."
                .to_string(),
            location: "NeueTech District, Hamburg, Germany".to_string(),
            image_url: Some("https://example.com/nexus.jpg".to_string()),
            display_order: 3,
            annual_roi_rate: dec!(0.0380),
            carbon_offset_rate: dec!(1.4000),
            total_funding_needed: dec!(220000),
            is_active: true,
        },
        NewReactor {
            slug: "fermi_iii".to_string(),
            name: "Fermi-III".to_string(),
            reactor_type: "Lead-Cooled Fast Breeder Reactor (LCFBR)".to_string(),
            description: "Generation IV fast-spectrum reactor on recycled fuel and depleted \
                uranium, cooled by molten lead, with an embedded fuel recycling loop."
                .to_string(),
            location: "Cobalt Energy Complex, Ontario, Canada".to_string(),
            image_url: Some("https://example.com/fermi.jpg".to_string()),
            display_order: 4,
            annual_roi_rate: dec!(0.0220),
            carbon_offset_rate: dec!(1.8500),
            total_funding_needed: dec!(160000),
            is_active: true,
        },
        NewReactor {
            slug: "helios_fusiondrive".to_string(),
            name: "Helios FusionDrive".to_string(),
            reactor_type: "Hybrid Fusion-Fission Blanket Reactor".to_string(),
            description: "Deuterium-tritium fusion neutron source driving a subcritical thorium \
                blanket, breeding fuel and transmuting waste."
                .to_string(),
            location: "Tokamak Research Facility, Japan".to_string(),
            image_url: Some("https://example.com/helios.jpg".to_string()),
            display_order: 5,
            annual_roi_rate: dec!(-0.0150),
            carbon_offset_rate: dec!(3.1500),
            total_funding_needed: dec!(95000),
            is_active: true,
        },
    ]
}
