use anyhow::Context;

use crate::bot::RepositoryClient;
use crate::config::SizeThresholds;

pub const SIZE_LABEL_PREFIX: &str = "size/";

/// One of a set of discrete diff-size buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeBucket {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl SizeBucket {
    pub fn label(self) -> &'static str {
        match self {
            SizeBucket::Xs => "size/XS",
            SizeBucket::S => "size/S",
            SizeBucket::M => "size/M",
            SizeBucket::L => "size/L",
            SizeBucket::Xl => "size/XL",
            SizeBucket::Xxl => "size/XXL",
        }
    }
}

/// Buckets a changed line count using strictly-less-than comparisons
/// against the ascending thresholds.
pub fn bucket(line_count: u64, thresholds: &SizeThresholds) -> SizeBucket {
    if line_count < thresholds.xs_upper_bound {
        SizeBucket::Xs
    } else if line_count < thresholds.s_upper_bound {
        SizeBucket::S
    } else if line_count < thresholds.m_upper_bound {
        SizeBucket::M
    } else if line_count < thresholds.l_upper_bound {
        SizeBucket::L
    } else if line_count < thresholds.xl_upper_bound {
        SizeBucket::Xl
    } else {
        SizeBucket::Xxl
    }
}

/// Recomputes the size label of a pull request from its current diff.
///
/// If the target label is already present nothing is mutated. Otherwise
/// all stale `size/` labels are swept (there should be at most one, but
/// all found are removed) before the target label is added; the two
/// phases are not atomic.
pub(super) async fn update_size_label<Client: RepositoryClient>(
    client: &Client,
    pr_number: u64,
    thresholds: &SizeThresholds,
) -> anyhow::Result<()> {
    let files = client
        .list_pull_request_files(pr_number)
        .await
        .context("Cannot get PR changes")?;
    let line_count: u64 = files.iter().map(|file| file.additions + file.deletions).sum();
    let target = bucket(line_count, thresholds).label();

    let labels = client
        .list_labels(pr_number)
        .await
        .context("Cannot list labels")?;
    if labels.iter().any(|label| label == target) {
        return Ok(());
    }

    for label in labels.iter().filter(|label| label.starts_with(SIZE_LABEL_PREFIX)) {
        if let Err(error) = client.remove_label(pr_number, label).await {
            tracing::error!("Cannot remove label {label}: {error:?}");
        }
    }
    tracing::info!("Adding label {target} ({line_count} changed lines)");
    client
        .add_labels(pr_number, &[target.to_string()])
        .await
        .context("Cannot add size label")
}
