// Discovery and ingestion of the posted result pages.
//
// The pages are named ad-<number>.html and may be nested in any number of
// subdirectories. They are processed one at a time, in district order, and all their
// rows go to the same output.

use std::io::Write;

use lazy_static::lazy_static;
use regex::Regex;
use result_pages::DistrictExtraction;

use crate::args::OutputMode;
use crate::report::*;

lazy_static! {
    static ref RESULTS_FILENAME: Regex = Regex::new(r"^ad-([0-9]+)\.html$").unwrap();
}

/// Where the extracted results are written.
pub enum ResultSink<W: Write> {
    Csv(csv::Writer<W>),
    Text(W),
}

impl<W: Write> ResultSink<W> {
    pub fn new(mode: OutputMode, out: W) -> ResultSink<W> {
        match mode {
            OutputMode::Csv => ResultSink::Csv(io_csv::make_writer(out)),
            OutputMode::Text => ResultSink::Text(out),
        }
    }

    pub fn write(&mut self, source: &Path, extraction: &DistrictExtraction) -> ReportResult<()> {
        match self {
            ResultSink::Csv(writer) => io_csv::write_extraction(writer, source, extraction),
            ResultSink::Text(out) => io_text::write_extraction(out, extraction),
        }
    }

    /// Flushes the output and gives it back.
    pub fn finish(self) -> ReportResult<W> {
        match self {
            ResultSink::Csv(writer) => writer
                .into_inner()
                .map_err(|e| e.into_error())
                .context(WritingOutputSnafu {}),
            ResultSink::Text(mut out) => {
                out.flush().context(WritingOutputSnafu {})?;
                Ok(out)
            }
        }
    }
}

/// The district number of a result page file name, if it is one.
pub fn page_district(file_name: &str) -> Option<u64> {
    RESULTS_FILENAME
        .captures(file_name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
}

/// Result pages come first, by district number then by name. Any other file comes after
/// them, by name.
pub fn file_order_key(file_name: &str) -> (bool, u64, String) {
    match page_district(file_name) {
        Some(x) => (false, x, file_name.to_string()),
        None => (true, 0, file_name.to_string()),
    }
}

/// Lists the result pages under the directory.
///
/// The pages of a directory are listed before the ones of its subdirectories, which
/// are visited by name.
pub fn discover_pages(dir: &Path) -> ReportResult<Vec<PathBuf>> {
    let mut files: Vec<String> = Vec::new();
    let mut subdirs: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).context(ReadingDirectorySnafu { path: dir })? {
        let entry = entry.context(ReadingDirectorySnafu { path: dir })?;
        // Symbolic links to directories are not followed.
        let file_type = entry
            .file_type()
            .context(ReadingDirectorySnafu { path: dir })?;
        if file_type.is_dir() {
            subdirs.push(entry.path());
        } else {
            files.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    files.sort_by_key(|name| file_order_key(name));
    subdirs.sort();

    let mut res: Vec<PathBuf> = files
        .iter()
        .filter(|name| page_district(name).is_some())
        .map(|name| dir.join(name))
        .collect();
    debug!("discover_pages: {:?}: {} pages", dir, res.len());
    for subdir in subdirs {
        res.extend(discover_pages(&subdir)?);
    }
    Ok(res)
}

/// Extracts one result page. Deferred pages give no results.
pub fn extract_page(path: &Path) -> ReportResult<Option<DistrictExtraction>> {
    info!("Reading result page {:?}", path);
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    result_pages::extract_html(&contents).context(ExtractionSnafu { path })
}

pub fn ingest_page<W: Write>(path: &Path, sink: &mut ResultSink<W>) -> ReportResult<()> {
    match extract_page(path)? {
        Some(extraction) => {
            debug!(
                "ingest_page: {:?}: AD-{}: {} candidates",
                path,
                extraction.district_number,
                extraction.results.len()
            );
            sink.write(path, &extraction)
        }
        None => {
            warn!("No results published yet in {:?}", path);
            Ok(())
        }
    }
}

/// Ingests all the result pages under the directory, in district order.
///
/// The first page that cannot be read stops the ingestion.
pub fn ingest_tree<W: Write>(dir: &Path, sink: &mut ResultSink<W>) -> ReportResult<()> {
    for page in discover_pages(dir)? {
        ingest_page(&page, sink)?;
    }
    Ok(())
}

/// Ingests a list of pages and directories. Files are read whatever their name.
pub fn ingest_paths<W: Write>(paths: &[String], sink: &mut ResultSink<W>) -> ReportResult<()> {
    for p in paths.iter() {
        let path = Path::new(p);
        if path.is_dir() {
            ingest_tree(path, sink)?;
        } else {
            ingest_page(path, sink)?;
        }
    }
    Ok(())
}

/// Writes the results of the pages to the output as they are extracted.
///
/// When a page fails, the results of the pages before it are still flushed.
pub fn stream_paths<W: Write>(mode: OutputMode, paths: &[String], out: W) -> ReportResult<W> {
    let mut sink = ResultSink::new(mode, out);
    let res = ingest_paths(paths, &mut sink);
    let out = sink.finish()?;
    res.map(|_| out)
}
