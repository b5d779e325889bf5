//! Validation of parsed compile requests.

use toml::Spanned;

use crate::{Request, Result, error::SourceContext};

/// Validate a parsed request against its source text.
pub(crate) fn validate_request(request: &Request, ctx: &SourceContext) -> Result<()> {
    for source in request.sources.iter().flatten() {
        non_empty(source, "source path must not be empty", ctx)?;
    }

    non_empty(
        &request.directories.classes,
        "class output directory must not be empty",
        ctx,
    )?;

    if request.processor_count() == 0 {
        return Ok(());
    }

    let directories = &request.directories;
    let required = [
        (
            "annotation_processing_sources",
            &directories.annotation_processing_sources,
        ),
        (
            "annotation_processing_classes",
            &directories.annotation_processing_classes,
        ),
        (
            "annotation_processing_stubs",
            &directories.annotation_processing_stubs,
        ),
        (
            "annotation_processing_incremental_data",
            &directories.annotation_processing_incremental_data,
        ),
    ];
    for (name, dir) in required {
        match dir {
            Some(dir) => non_empty(dir, &format!("'{name}' must not be empty"), ctx)?,
            None => {
                return Err(ctx.validation_error(format!(
                    "annotation processors are configured but 'directories.{name}' is missing"
                )));
            }
        }
    }

    for processor in request
        .annotation_processing
        .iter()
        .flat_map(|ap| &ap.processors)
    {
        let class = &processor.processor_class;
        non_empty(class, "processor class must not be empty", ctx)?;
        if class.get_ref().contains(',') {
            return Err(ctx.validation_error_at(
                "processor class must not contain ','",
                class.span(),
            ));
        }
    }

    Ok(())
}

fn non_empty(value: &Spanned<String>, message: &str, ctx: &SourceContext) -> Result<()> {
    if value.get_ref().trim().is_empty() {
        return Err(ctx.validation_error_at(message, value.span()));
    }
    Ok(())
}
