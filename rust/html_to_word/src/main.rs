use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use word_html::{write_docx, DocxOptions, Normalizer, Orientation, Profile, Template};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input HTML file (fragment or full document; the body is used).
    #[arg(long, conflicts_with_all = ["text", "template"])]
    html_file: Option<PathBuf>,

    /// Inline HTML input.
    #[arg(long, conflicts_with = "template")]
    text: Option<String>,

    /// Template JSON (bare or wrapped in {"data": ...}); its valid sections are
    /// rendered in sort order.
    #[arg(long)]
    template: Option<PathBuf>,

    /// Use the restricted compatibility profile.
    #[arg(long)]
    compat: bool,

    /// Explicit profile (standard | restricted); overrides --compat.
    #[arg(long)]
    profile: Option<Profile>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output kind; inferred from the --out extension when omitted.
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Landscape pages for .docx output.
    #[arg(long)]
    landscape: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Standalone HTML document.
    Html,
    /// Sanitized body markup only.
    Fragment,
    /// Word package with the document embedded.
    Docx,
}

fn infer_format(out: Option<&Path>) -> Format {
    match out
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("docx") => Format::Docx,
        _ => Format::Html,
    }
}

fn check_output(format: Format, out: Option<&Path>) -> Result<()> {
    if format == Format::Docx && out.is_none() {
        bail!("--out is required for docx output");
    }
    Ok(())
}

fn read_to_string(path: &Path) -> Result<String> {
    let mut s = String::new();
    File::open(path)
        .with_context(|| format!("open {}", path.display()))?
        .read_to_string(&mut s)
        .with_context(|| format!("read {}", path.display()))?;
    Ok(s)
}

fn read_stdin() -> Result<String> {
    let mut s = String::new();
    std::io::stdin()
        .read_to_string(&mut s)
        .context("read stdin")?;
    Ok(s)
}

fn render(args: &Args, profile: Profile, format: Format) -> Result<String> {
    let normalizer = Normalizer::new(profile);

    if let Some(path) = &args.template {
        let mut template = Template::from_json(&read_to_string(path)?)
            .with_context(|| format!("parse template {}", path.display()))?;
        template.validate()?;
        if format == Format::Fragment {
            template.normalize_sections(profile);
            return Ok(template.to_json()?);
        }
        return Ok(template.render_document(profile));
    }

    let html = match (&args.html_file, &args.text) {
        (Some(path), _) => read_to_string(path)?,
        (None, Some(text)) => text.clone(),
        (None, None) => read_stdin()?,
    };

    let (out, report) = match format {
        Format::Fragment => normalizer.sanitize_with_report(&html),
        Format::Html | Format::Docx => normalizer.normalize_with_report(&html),
    };
    log::info!(
        "{profile} profile: removed {} node(s), {} attribute(s); inserted {} break(s)",
        report.removed_elements,
        report.removed_attributes,
        report.inserted_breaks
    );
    Ok(out)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let profile = args
        .profile
        .unwrap_or_else(|| Profile::from_compat_mode(args.compat));
    let format = args
        .format
        .unwrap_or_else(|| infer_format(args.out.as_deref()));

    check_output(format, args.out.as_deref())?;
    let rendered = render(&args, profile, format)?;

    match (format, &args.out) {
        (Format::Docx, Some(path)) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
            let options = DocxOptions {
                orientation: if args.landscape {
                    Orientation::Landscape
                } else {
                    Orientation::Portrait
                },
                ..DocxOptions::default()
            };
            write_docx(BufWriter::new(file), &rendered, &options)
                .with_context(|| format!("write {}", path.display()))?
                .flush()?;
        }
        (_, Some(path)) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, rendered.as_bytes())
                .with_context(|| format!("write {}", path.display()))?;
        }
        (_, None) => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(rendered.as_bytes())?;
            lock.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_output_extension() {
        assert_eq!(infer_format(Some(Path::new("out/Report.DOCX"))), Format::Docx);
        assert_eq!(infer_format(Some(Path::new("out/report.html"))), Format::Html);
        assert_eq!(infer_format(None), Format::Html);
    }

    #[test]
    fn docx_without_out_is_rejected_up_front() {
        assert!(check_output(Format::Docx, None).is_err());
        assert!(check_output(Format::Docx, Some(Path::new("a.docx"))).is_ok());
        assert!(check_output(Format::Html, None).is_ok());
    }

    #[test]
    fn parses_profile_flags() {
        let args = Args::parse_from(["html_to_word", "--text", "<p>x</p>", "--profile", "sharepoint"]);
        assert_eq!(args.profile, Some(Profile::RestrictedCompatibility));

        let args = Args::parse_from(["html_to_word", "--text", "<p>x</p>", "--compat"]);
        assert!(args.compat);
        assert!(Args::try_parse_from(["html_to_word", "--text", "a", "--html-file", "b"]).is_err());
    }

    #[test]
    fn renders_inline_text_as_fragment() {
        let args = Args::parse_from(["html_to_word", "--text", "<p onclick=x>a</p>"]);
        let out = render(&args, Profile::Standard, Format::Fragment).unwrap();
        assert_eq!(out, "<p>a</p>\n");
    }
}
