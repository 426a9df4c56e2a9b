use std::path::{Path, PathBuf};

use anyhow::Context as _;
use kapper_cluster::{
    diff_layers, ClusterSplitter, LayerDiff, MarkerKey, MarkerLayer, Nearest, RenderItem,
    ZoomThresholdTable,
};
use kapper_core::{Coordinate, PointBatch, ProviderFilter};
use serde::Serialize;

/// Layer configuration plus where to read providers from.
pub struct Context {
    pub layer: MarkerLayer,
    providers_path: PathBuf,
}

impl Context {
    pub fn load(providers_path: &Path, zoom_table: Option<&Path>) -> anyhow::Result<Self> {
        let table = match zoom_table {
            Some(path) => ZoomThresholdTable::load(path)
                .with_context(|| format!("loading zoom table {}", path.display()))?,
            None => ZoomThresholdTable::default(),
        };
        Ok(Self {
            layer: MarkerLayer::new(table, ClusterSplitter::default()),
            providers_path: providers_path.to_path_buf(),
        })
    }

    fn batch(&self) -> anyhow::Result<PointBatch> {
        let file = kapper_core::load_providers(&self.providers_path)
            .with_context(|| format!("loading providers {}", self.providers_path.display()))?;
        let batch = kapper_core::into_points(&file.providers);
        for skipped in &batch.skipped {
            tracing::warn!(id = %skipped.id, reason = %skipped.reason, "provider skipped");
        }
        tracing::info!(
            path = %self.providers_path.display(),
            accepted = batch.points.len(),
            skipped = batch.skipped.len(),
            "providers loaded"
        );
        Ok(batch)
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum MarkerOut<'a> {
    Cluster {
        latitude: f64,
        longitude: f64,
        count: usize,
        members: Vec<&'a str>,
    },
    Point {
        id: &'a str,
        name: &'a str,
        latitude: f64,
        longitude: f64,
    },
}

impl<'a> From<&RenderItem<'a>> for MarkerOut<'a> {
    fn from(item: &RenderItem<'a>) -> Self {
        match item {
            RenderItem::Cluster(cluster) => {
                let centroid = cluster.centroid();
                MarkerOut::Cluster {
                    latitude: centroid.lat,
                    longitude: centroid.lng,
                    count: cluster.count(),
                    members: cluster.members().iter().map(|p| p.id()).collect(),
                }
            }
            RenderItem::Point(point) => MarkerOut::Point {
                id: point.id(),
                name: point.name(),
                latitude: point.lat(),
                longitude: point.lng(),
            },
        }
    }
}

pub fn markers(
    ctx: &Context,
    zoom: f64,
    filter: ProviderFilter,
    json: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(zoom.is_finite(), "zoom must be a finite number");
    let batch = ctx.batch()?;
    let points = filter.apply(&batch.points);
    let total = points.len();
    let items = ctx.layer.render(points, zoom);

    if json {
        let out: Vec<MarkerOut<'_>> = items.iter().map(MarkerOut::from).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!(
            "{}",
            format_markers(&items, zoom, ctx.layer.table().describe(zoom), total)
        );
    }
    Ok(())
}

pub fn format_markers(items: &[RenderItem<'_>], zoom: f64, band: &str, total: usize) -> String {
    let header = format!(
        "zoom {zoom} ({band}): {total} providers -> {} markers",
        items.len()
    );
    let rows = items.iter().map(|item| {
        let at = item.coordinate();
        match item {
            RenderItem::Cluster(cluster) => {
                let ids: Vec<&str> = cluster.members().iter().map(|p| p.id()).collect();
                format!(
                    "  cluster {:>9.5} {:>10.5}  count={} [{}]",
                    at.lat,
                    at.lng,
                    cluster.count(),
                    ids.join(", ")
                )
            }
            RenderItem::Point(point) => format!(
                "  point   {:>9.5} {:>10.5}  {} {}",
                at.lat,
                at.lng,
                point.id(),
                point.name()
            ),
        }
    });
    lines(std::iter::once(header).chain(rows))
}

/// Newline-terminated block from a sequence of lines.
fn lines(rows: impl Iterator<Item = String>) -> String {
    rows.map(|row| row + "\n").collect()
}

pub fn nearest(ctx: &Context, lat: f64, lng: f64) -> anyhow::Result<()> {
    let reference = Coordinate::new(lat, lng);
    anyhow::ensure!(
        reference.is_valid(),
        "lat must be within [-90, 90] and lng within [-180, 180]"
    );
    let batch = ctx.batch()?;
    println!(
        "{}",
        format_nearest(kapper_cluster::nearest(reference, &batch.points))
    );
    Ok(())
}

pub fn format_nearest(hit: Option<Nearest<'_>>) -> String {
    match hit {
        Some(hit) => format!(
            "nearest: {} ({}) at {} m",
            hit.point.name(),
            hit.point.id(),
            hit.rounded_meters()
        ),
        None => "nearest: no providers with coordinates".to_string(),
    }
}

pub fn transition(ctx: &Context, from: f64, to: f64, json: bool) -> anyhow::Result<()> {
    anyhow::ensure!(
        from.is_finite() && to.is_finite(),
        "zoom levels must be finite numbers"
    );
    let batch = ctx.batch()?;
    let before = ctx.layer.render(&batch.points, from);
    let after = ctx.layer.render(&batch.points, to);
    let diff = diff_layers(&before, &after);

    if json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
    } else {
        print!("{}", format_transition(&diff, from, to));
    }
    Ok(())
}

fn describe_key(key: &MarkerKey) -> String {
    match key {
        MarkerKey::Point { id } => format!("point {id}"),
        MarkerKey::Cluster { members } => format!("cluster [{}]", members.join(", ")),
    }
}

pub fn format_transition(diff: &LayerDiff, from: f64, to: f64) -> String {
    let header = format!(
        "zoom {from} -> {to}: +{} -{} ={}",
        diff.added.len(),
        diff.removed.len(),
        diff.retained.len()
    );
    let removed = diff.removed.iter().map(|k| format!("  - {}", describe_key(k)));
    let added = diff.added.iter().map(|k| format!("  + {}", describe_key(k)));
    lines(std::iter::once(header).chain(removed).chain(added))
}

pub fn zoom_table(ctx: &Context) {
    print!("{}", format_zoom_table(ctx.layer.table(), ctx.layer.splitter()));
}

pub fn format_zoom_table(table: &ZoomThresholdTable, splitter: &ClusterSplitter) -> String {
    let first = format!("zoom < {}: single cluster", table.single_cluster_below());
    let steps = table.steps().iter().map(|step| {
        format!(
            "zoom >= {:<5} radius {:<5} {}",
            step.min_zoom, step.radius, step.label
        )
    });
    let tail = [
        format!("zoom >= {}: individual markers", table.identity_from()),
        format!(
            "clusters of <= {} explode from zoom {}",
            splitter.max_exploded_size(),
            splitter.split_from_zoom()
        ),
    ];
    lines(std::iter::once(first).chain(steps).chain(tail))
}

/// Load the providers file and list rejected records.
///
/// # Errors
///
/// Fails when the providers file cannot be read, parsed, or validated.
pub fn validate(ctx: &Context) -> anyhow::Result<()> {
    let batch = ctx.batch()?;
    println!(
        "{} providers accepted, {} skipped",
        batch.points.len(),
        batch.skipped.len()
    );
    for skipped in &batch.skipped {
        println!("  {}: {}", skipped.id, skipped.reason);
    }
    Ok(())
}
