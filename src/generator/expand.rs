use super::{command_text, reindex_literal, GenContext, GenError, OpRegistry};
use crate::config::OpSpec;
use anyhow::Context;
use std::io::Write;

/// Expand one operation block into `sink`.
///
/// Records are written one per line, separated by commas. The block's last
/// record gets a trailing comma only when `append_trailing_comma` is set.
/// Returns the number of records written.
pub fn expand_op<W: Write>(
    spec: &OpSpec,
    append_trailing_comma: bool,
    registry: &OpRegistry,
    ctx: &mut GenContext<'_>,
    sink: &mut W,
) -> anyhow::Result<usize> {
    expand_block(spec, append_trailing_comma, registry, ctx, sink)
        .with_context(|| format!("cannot generate op {}", spec.label()))
}

fn expand_block<W: Write>(
    spec: &OpSpec,
    append_trailing_comma: bool,
    registry: &OpRegistry,
    ctx: &mut GenContext<'_>,
    sink: &mut W,
) -> Result<usize, GenError> {
    spec.check_exclusive()?;

    if let Some(commands) = &spec.literal_commands {
        if commands.is_empty() {
            return Ok(0);
        }
        let lines: Vec<String> = commands
            .iter()
            .map(|raw| reindex_literal(&command_text(raw), &mut ctx.seq))
            .collect();
        let mut block = lines.join(",\n");
        if append_trailing_comma {
            block.push(',');
        }
        block.push('\n');
        sink.write_all(block.as_bytes())?;
        return Ok(commands.len());
    }

    // a zero-count block needs no handler, even an unknown or unset one
    if spec.count == 0 {
        return Ok(0);
    }

    let op = spec.op_type.as_deref().unwrap_or_default();
    let handler = registry
        .get(op)
        .ok_or_else(|| GenError::UnknownOperation(op.to_string()))?;

    for i in 0..spec.count {
        let mut line = handler.synthesize(spec, ctx)?;
        if i + 1 != spec.count || append_trailing_comma {
            line.push(',');
        }
        line.push('\n');
        sink.write_all(line.as_bytes())?;
    }

    Ok(spec.count)
}
