mod cli;
mod output;

use allocation_ranker::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
