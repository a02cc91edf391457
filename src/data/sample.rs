//! Deterministic synthetic declarations.
//!
//! [`generate`] draws raw declarants, mandates and declaration documents from
//! a seeded PRNG and runs them through [`aggregate`](super::aggregate) to
//! produce the five summary datasets. The bundled `data/` directory is
//! `generate(DEFAULT_SEED)` written with [`write_csv`](super::aggregate::write_csv).

use super::aggregate::{self, AgeBands};
use super::model::{Dataset, Row};

pub const DEFAULT_SEED: u64 = 42;
pub const DECLARANTS: usize = 2000;
pub const MANDATES_PER_TYPE: usize = 150;
pub const DOCUMENTS: usize = 800;

/// Minimal deterministic PRNG (xoshiro256**)
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    pub fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Organizations searched for in declarations, most cited first.
pub const ORGANIZATIONS: &[&str] = &[
    "Assemblée nationale",
    "Sénat",
    "Caisse des dépôts",
    "EDF",
    "SNCF",
    "Crédit Agricole",
    "BNP Paribas",
    "Société Générale",
    "TotalEnergies",
    "Airbus",
    "Orange",
    "La Poste",
    "CNRS",
    "Sciences Po",
    "Conseil d'État",
    "Banque de France",
    "Engie",
    "Veolia",
    "Thales",
    "Safran",
];

/// (mandate type, typical delay in days)
pub const MANDATES: &[(&str, f64)] = &[
    ("Député", 95.0),
    ("Sénateur", 110.0),
    ("Maire", 160.0),
    ("Conseiller régional", 140.0),
    ("Conseiller départemental", 150.0),
    ("Membre du gouvernement", 45.0),
    ("Représentant au Parlement européen", 120.0),
];

/// `age,gender` rows; ages are whole years in `[20, 99]`.
pub fn declarants(rng: &mut SimpleRng, n: usize) -> Vec<Row> {
    (0..n)
        .map(|_| {
            let gender = if rng.next_f64() < 0.7 { "male" } else { "female" };
            let mean = if gender == "male" { 58.0 } else { 53.0 };
            let age = rng.gauss(mean, 11.0).clamp(20.0, 99.0).floor();
            Row::new().with("age", age).with("gender", gender)
        })
        .collect()
}

/// `mandate_type,delay_days` rows, `per_type` for each entry of [`MANDATES`].
pub fn mandates(rng: &mut SimpleRng, per_type: usize) -> Vec<Row> {
    MANDATES
        .iter()
        .flat_map(|&(kind, typical)| {
            (0..per_type)
                .map(|_| {
                    let delay = rng.gauss(typical, typical * 0.3).max(1.0).round();
                    Row::new().with("mandate_type", kind).with("delay_days", delay)
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// `(file name, xml text)` declarations citing organizations with a
/// Zipf-like frequency. Some citations are repeated within a document.
pub fn documents(rng: &mut SimpleRng, n: usize) -> Vec<(String, String)> {
    (1..=n)
        .map(|i| {
            let mut text = format!("<declaration id=\"{i}\">\n");
            for (rank, name) in ORGANIZATIONS.iter().enumerate() {
                // the last two are never cited
                let weight = if rank + 2 >= ORGANIZATIONS.len() {
                    0.0
                } else {
                    0.8 / (rank as f64 + 1.0)
                };
                if rng.next_f64() < weight {
                    text.push_str(&format!("  <organisme>{name}</organisme>\n"));
                    if rng.next_f64() < 0.3 {
                        text.push_str(&format!(
                            "  <commentaire>Mandat au sein de {name}.</commentaire>\n"
                        ));
                    }
                }
            }
            text.push_str("</declaration>\n");
            (format!("declaration_{i:04}.xml"), text)
        })
        .collect()
}

/// The five summary datasets, in the order the generator writes them.
pub fn generate(seed: u64) -> Vec<Dataset> {
    let mut rng = SimpleRng::new(seed);
    let bands = AgeBands::default();

    let people = declarants(&mut rng, DECLARANTS);
    let people: Vec<&Row> = people.iter().collect();
    let mandate_rows = mandates(&mut rng, MANDATES_PER_TYPE);
    let mandate_rows: Vec<&Row> = mandate_rows.iter().collect();
    let docs = documents(&mut rng, DOCUMENTS);
    log::debug!(
        "seed {seed}: {} declarants, {} mandates, {} documents",
        people.len(),
        mandate_rows.len(),
        docs.len()
    );

    vec![
        aggregate::age_band_counts(&people, "age", &bands),
        aggregate::gender_counts(&people, "gender"),
        aggregate::age_pyramid(&people, "age", "gender", &bands),
        aggregate::median_by(
            &mandate_rows,
            "mandate_type",
            "delay_days",
            "mandate_delay_median.csv",
        ),
        aggregate::organization_mentions(&aggregate::mention_counts(&docs, ORGANIZATIONS)),
    ]
}
