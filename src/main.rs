mod backend;
mod config;
mod metadata;
mod point;
mod sampler;
mod session;
mod spectrum;
mod wavelengths;

use backend::{Extent, FetchError, GeoTiffCatalog, MemoryImage, SourceImage};
use chrono::NaiveDate;
use config::Config;
use point::ClickPoint;
use session::{ClickSession, PlotSink};
use spectrum::Spectrum;
use std::sync::Arc;

// Stands in for the line-chart widget: prints the spectrum instead of
// drawing it.
struct TextPlot;

impl PlotSink for TextPlot {
    fn render(&self, spectrum: &Spectrum) {
        println!("{}", spectrum);

        let n = spectrum.len();
        if n > 0 {
            println!(
                "  Mean reflectance: {:.4}",
                spectrum.reflectances().sum::<f64>() / n as f64
            );
            println!(
                "  First 10 pairs (nm, reflectance): {:?}",
                spectrum.pairs().iter().take(10).collect::<Vec<_>>()
            );
        }
    }

    fn render_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }
}

// A small vegetation-like mosaic over the SOAP site, used when no local
// reflectance GeoTIFFs are available.
fn synthetic_image() -> MemoryImage {
    let mut image = MemoryImage::new(
        16,
        16,
        Extent {
            xmin: -119.5,
            xmax: -119.0,
            ymin: 36.9,
            ymax: 37.2,
        },
    );

    image.insert_property("NEON_SITE", "SOAP");
    image.insert_property("ACQUISITION_DATE", "2021-06-14");

    let bands = [
        ("B001", 450.5, 0.031),
        ("B002", 550.2, 0.082),
        ("B003", 650.8, 0.048),
        ("B004", 850.3, 0.352),
    ];

    for (name, wavelength, reflectance) in bands {
        image.insert_property(format!("WL_FWHM_{}", name), format!("{},5.8465", wavelength));
        image.push_flat_band(name, reflectance);
    }

    image
}

fn default_config() -> Config {
    Config::new(
        "SOAP",
        NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
        "./data/aop",
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Starting NEON AOP reflectance spectrum demo...");

    let config = match Config::from_file("./data/config/config.json") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Could not load config ({}), using defaults", e);
            default_config()
        }
    };

    let catalog = GeoTiffCatalog::new(config.collection());
    let image: Arc<dyn SourceImage> = match catalog.fetch_first(&config.filter()) {
        Ok(image) => Arc::new(image),
        Err(e @ FetchError::NoMatch { .. }) => {
            eprintln!("{}; using a synthetic image", e);
            Arc::new(synthetic_image())
        }
        Err(e) => return Err(Box::new(e)),
    };

    let session = ClickSession::new(image, config.max_sample_retries())?;
    println!(
        "Site {}: image with {} wavelengths",
        config.site(),
        session.wavelengths().len()
    );

    // Click coordinates from the command line, defaulting to a point inside
    // the SOAP flight box
    let args: Vec<String> = std::env::args().collect();
    let (lat, lon) = if args.len() >= 3 {
        (args[1].parse()?, args[2].parse()?)
    } else {
        (37.03, -119.26)
    };

    let point = ClickPoint::new(lat, lon)?;
    println!("Sampling spectrum at lat {}, lon {}", point.lat, point.lon);

    session.handle_click(point, &TextPlot);

    Ok(())
}
