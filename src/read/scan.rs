use crate::common::expression::Expressions;
use crate::error::Result;
use crate::read;

use aws_sdk_dynamodb::{Client, error, operation};

/// scan operation
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ScanInput {
    multiple_read_operation: read::common::MultipleReadInput,
    segment: Option<i32>,
    total_segments: Option<i32>,
}

/// Scan operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_fluent::read;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let output = read::scan::Scan::new("users")
///     .filter_with("#status = {0}", ["active"])?
///     .with_attribute("#status", "status")?
///     .send(client)
///     .await?;
/// # let _ = output;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scan {
    expressions: Expressions,
    read_args: read::common::MultipleReadArgs,
    segment: Option<i32>,
    table_name: String,
    total_segments: Option<i32>,
}

impl Scan {
    /// Start a scan of `table_name`.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    /// Scan only `segment` (0-indexed) out of `total_segments` for a parallel scan.
    pub fn segment(mut self, segment: i32, total_segments: i32) -> Self {
        self.segment = Some(segment);
        self.total_segments = Some(total_segments);
        self
    }

    pub(crate) fn build(self) -> Result<ScanInput> {
        let multiple_read_operation = self
            .read_args
            .into_input(self.table_name, self.expressions);
        Ok(ScanInput {
            multiple_read_operation,
            segment: self.segment,
            total_segments: self.total_segments,
        })
    }

    /// Execute the scan operation.
    ///
    /// Returns a single page; continue with
    /// [`exclusive_start_key`](Self::exclusive_start_key).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_fluent.scan", skip_all, err)
    )]
    pub async fn send(
        self,
        client: &Client,
    ) -> Result<operation::scan::ScanOutput, error::SdkError<operation::scan::ScanError>> {
        let scan = self.build().map_err(error::BuildError::other)?;
        let builder = client
            .scan()
            .set_segment(scan.segment)
            .set_total_segments(scan.total_segments);
        crate::apply_multiple_read_operation!(builder, scan.multiple_read_operation)
            .send()
            .await
    }
}

crate::impl_attribute_name_methods!(Scan);
crate::impl_attribute_value_methods!(Scan);
crate::impl_multiple_read_methods!(Scan);
