//! Seed data for the product store.
//!
//! The store is cleared and reseeded from a fixed list on every start.
//! The list is either the built-in catalog below or a YAML file supplied
//! through settings.

use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{Memory, Product};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
}

/// Load a seed list from a YAML file containing a sequence of products.
pub fn load_seed_file(path: &Path) -> Result<Vec<Product>, SeedError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SeedError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let products: Vec<Product> = serde_yml::from_str(&contents).map_err(|e| SeedError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;
    log::debug!("Loaded {} seed products from {}", products.len(), path.display());
    Ok(products)
}

const IMAGE_DIR: &str = "assets/images/products";

#[allow(clippy::too_many_arguments)]
fn product(
    name: &str,
    price: f64,
    (year, month, day): (i32, u32, u32),
    vendor: &str,
    stock: u32,
    color: &str,
    memory_gb: u32,
    fans: &str,
    image: &str,
) -> Product {
    Product {
        name: name.to_string(),
        price,
        vendor: vendor.to_string(),
        memory: Memory::Gigabytes(memory_gb),
        color: color.to_string(),
        stock,
        image: format!("{IMAGE_DIR}/{image}"),
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        fans: fans.to_string(),
    }
}

/// The built-in graphics card catalog.
pub fn default_products() -> Vec<Product> {
    vec![
        product(
            "GIGABYTE GeForce RTX 3070 Ti GAMING OC",
            78400.0,
            (2022, 7, 13),
            "Gigabyte",
            10,
            "black",
            8,
            "3",
            "3070.jpg.webp",
        ),
        product(
            "Palit GeForce RTX 3070 Ti GamingPro",
            72999.0,
            (2022, 6, 10),
            "Palit",
            23,
            "rgb",
            8,
            "3",
            "3070palit.jpg.webp",
        ),
        product(
            "PowerColor AMD Radeon RX 6600 Fighter",
            36300.0,
            (2022, 7, 13),
            "PowerColor",
            3,
            "black",
            8,
            "2",
            "r6600.png",
        ),
        product(
            "Palit GeForce RTX 3080 GamingPro (LHR)",
            94500.0,
            (2021, 11, 1),
            "Palit",
            2,
            "rgb",
            12,
            "3",
            "3080palit.png",
        ),
        product(
            "Palit GeForce RTX 2060 Dual",
            34999.0,
            (2020, 8, 15),
            "Palit",
            15,
            "black",
            12,
            "2",
            "2060palit.png",
        ),
        product(
            "Palit GeForce RTX 3060 DUAL OC (LHR)",
            49799.0,
            (2021, 8, 15),
            "Palit",
            7,
            "black",
            12,
            "2",
            "3060palit.png",
        ),
        product(
            "GIGABYTE GeForce RTX 3080 Ti GAMING OC",
            139999.0,
            (2022, 3, 14),
            "Gigabyte",
            1,
            "white",
            12,
            "3",
            "3080Gigabyte.png",
        ),
        product(
            "Palit GeForce GTX 1050 Ti STORMX",
            13999.0,
            (2019, 3, 10),
            "Palit",
            100,
            "black",
            4,
            "1",
            "1050tipalit.png",
        ),
        product(
            "MSI GeForce GTX 1660 SUPER Gaming X",
            39999.0,
            (2021, 6, 21),
            "MSI",
            11,
            "rgb",
            6,
            "2",
            "1660msi.png",
        ),
        product(
            "MSI GeForce RTX 3060 Ti VENTUS 2X OCV1 (LHR)",
            52999.0,
            (2021, 12, 12),
            "MSI",
            0,
            "black",
            8,
            "2",
            "3060msi.png",
        ),
        product(
            "KFA2 GeForce GTX 1660 SUPER 1-click OC",
            31999.0,
            (2022, 4, 10),
            "KFA2",
            39,
            "black",
            6,
            "2",
            "1660kfa.png",
        ),
        product(
            "GIGABYTE GeForce RTX 3080 Ti VISION OC",
            119999.0,
            (2022, 1, 15),
            "Gigabyte",
            3,
            "white",
            12,
            "3",
            "3080tiGigabyte.png",
        ),
        product(
            "MSI AMD Radeon RX 550 AERO ITX OC",
            14299.0,
            (2022, 3, 24),
            "MSI",
            45,
            "black",
            4,
            "1",
            "r550msi.png",
        ),
        product(
            "GIGABYTE AORUS Radeon RX 6900 XT MASTER",
            122999.0,
            (2021, 10, 13),
            "Gigabyte",
            3,
            "rgb",
            16,
            "3",
            "r6900gig.png",
        ),
        product(
            "KFA2 GeForce RTX 2060 CORE (1-Click OC)",
            41299.0,
            (2022, 6, 15),
            "KFA2",
            56,
            "metal",
            12,
            "2",
            "2060kfa.png",
        ),
        product(
            "MSI GeForce GTX 1660 SUPER VENTUS XS OC",
            35499.0,
            (2021, 9, 29),
            "MSI",
            14,
            "metal",
            6,
            "2",
            "1660supermsi.png",
        ),
        product(
            "GIGABYTE AMD Radeon RX 6600 EAGLE",
            33999.0,
            (2021, 12, 28),
            "Gigabyte",
            25,
            "gray",
            8,
            "3",
            "r6600msi.png",
        ),
        product(
            "GIGABYTE GeForce RTX 3090 TURBO",
            161999.0,
            (2021, 10, 5),
            "Gigabyte",
            2,
            "gray",
            24,
            "Turbo",
            "3090gig.png",
        ),
        product(
            "PowerColor AMD Radeon RX 6900 XT Red Devil",
            126999.0,
            (2022, 1, 27),
            "PowerColor",
            14,
            "black",
            16,
            "3",
            "r6900pc.png",
        ),
        product(
            "ASUS GeForce GT 730 Silent LP",
            5199.0,
            (2020, 6, 24),
            "Asus",
            158,
            "black",
            2,
            "Passive",
            "730asus.png",
        ),
        product(
            "ASUS GeForce RTX 3060 PHOENIX (LHR)",
            63499.0,
            (2021, 6, 28),
            "Asus",
            0,
            "black",
            12,
            "1",
            "3060asus.png",
        ),
        product(
            "MSI GeForce 210",
            3399.0,
            (2018, 2, 27),
            "MSI",
            87,
            "black",
            1,
            "1",
            "210msi.png",
        ),
        product(
            "ASRock AMD Radeon RX 6600 XT Challenger D OC",
            43299.0,
            (2021, 6, 19),
            "ASRock",
            3,
            "black",
            8,
            "2",
            "r6600asr.png",
        ),
        product(
            "ZOTAC GAMING GeForce RTX 3060 Ti AMP LHR White Edition",
            67499.0,
            (2022, 1, 19),
            "Zotac",
            5,
            "white",
            8,
            "2",
            "3060zotac.png",
        ),
        product(
            "KFA2 GeForce GT 1030",
            6199.0,
            (2022, 1, 1),
            "KFA2",
            4,
            "blue",
            2,
            "1",
            "1030kfa.png",
        ),
    ]
}
