use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "archash")]
#[command(version)]
#[command(about = "Size and content hash of a file, archive or workbook", long_about = None)]
#[command(after_help = "Examples:\n  \
  archash data.zip                      CRC sum of the archive entries\n  \
  archash report.xlsx -f xlsx           hash of the workbook's cell content\n  \
  archash -l boundaries.zip -f shp      also list each entry's CRC32\n  \
  archash https://example.com/big.zip   CRC sum fetched with Range requests")]
pub struct Cli {
    /// File path or HTTP URL
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Declared file format (zip, xlsx, shp, csv...)
    #[arg(short = 'f', long = "format", default_value = "zip")]
    pub format: String,

    /// List each ZIP entry with its CRC32
    #[arg(short = 'l')]
    pub list: bool,

    /// Verbose logging (-vv => trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log as JSON lines
    #[arg(long = "json-log")]
    pub json_log: bool,
}

impl Cli {
    pub fn is_http_url(&self) -> bool {
        self.file.starts_with("http://") || self.file.starts_with("https://")
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
