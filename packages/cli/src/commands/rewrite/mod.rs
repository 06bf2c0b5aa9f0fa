mod execute;

use crate::app::AppContext;
use crate::cli::rewrite::RewriteArgs;
use crate::error::CliError;

pub fn run(context: &AppContext, args: RewriteArgs) -> Result<(), CliError> {
    execute::run(context, args)
}
