//! gapiutils CLI - Work with Google Drive and Sheets from the command line.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use gapiutils::drive::{DownloadOptions, PermissionOptions, UploadOptions};
use gapiutils::sheets::a1::number_to_a1;
use gapiutils::sheets::table::cell_to_string;
use gapiutils::{extract_id, Authenticator, Drive, FileMetadata, GoogleMimeType, Sheets};

/// CLI tool for Google Drive and Google Sheets.
#[derive(Parser)]
#[command(name = "gapiutils")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a service account or authorized user JSON credentials file.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Shared Drive ID to scope listings to (can also be set via SHARED_DRIVE_ID env var).
    #[arg(long, env = "SHARED_DRIVE_ID")]
    drive_id: Option<String>,

    /// Log debug output to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files in a folder, or files matching a Drive query.
    List {
        /// Folder URL or ID.
        folder: Option<String>,

        /// Raw Drive search query, e.g. "name contains 'report'".
        #[arg(long, short = 'q', conflicts_with = "folder")]
        query: Option<String>,
    },

    /// Upload files to a folder.
    Upload {
        /// File patterns to upload (supports glob patterns like *.tar, file_{1,2,3}.txt).
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Destination folder URL or ID.
        #[arg(long, short = 't')]
        to: Option<String>,

        /// Drive MIME type to convert to, e.g. application/vnd.google-apps.spreadsheet.
        #[arg(long)]
        mime_type: Option<GoogleMimeType>,

        /// Always create a new file, even if one with the same name exists.
        #[arg(long)]
        no_update: bool,
    },

    /// Download a file or folder to the local filesystem.
    Download {
        /// File or folder URL or ID to download.
        file: String,

        /// Local destination path (file or directory).
        #[arg(long, short = 't', default_value = ".")]
        to: PathBuf,

        /// Download folder contents recursively.
        #[arg(long, short = 'r')]
        recursive: bool,
    },

    /// Copy a file into a folder.
    Copy {
        /// File URL or ID to copy.
        file: String,

        /// Name of the copy.
        #[arg(long, short = 'n')]
        name: String,

        /// Destination folder URL or ID.
        #[arg(long, short = 't')]
        to: String,
    },

    /// Create folders.
    Mkdir {
        /// Folder names.
        #[arg(required = true)]
        names: Vec<String>,

        /// Parent folder URL or ID.
        #[arg(long, short = 'p')]
        parent: Option<String>,
    },

    /// Grant users access to a file.
    Share {
        /// File URL or ID.
        file: String,

        /// Email addresses of the users.
        #[arg(required = true)]
        emails: Vec<String>,

        /// Role to grant (reader, commenter, writer, ...).
        #[arg(long, default_value = "reader")]
        role: String,

        /// Do not send a notification email.
        #[arg(long)]
        no_notify: bool,

        /// Create the permission even if the user already has one.
        #[arg(long)]
        force: bool,
    },

    /// List the permissions on a file.
    Permissions {
        /// File URL or ID.
        file: String,
    },

    /// Print the values of a spreadsheet range.
    Values {
        /// Spreadsheet URL or ID.
        spreadsheet: String,

        /// Range in A1 notation, e.g. 'Sheet1'!A1:C10.
        #[arg(default_value = gapiutils::sheets::DEFAULT_SHEET_NAME)]
        range: String,
    },

    /// Overwrite a spreadsheet range with values.
    Update {
        /// Spreadsheet URL or ID.
        spreadsheet: String,

        /// Range in A1 notation.
        range: String,

        /// Values as a JSON array of rows, or "-" to read them from stdin.
        #[arg(long)]
        values: String,
    },

    /// Append rows after the table in a spreadsheet range.
    Append {
        /// Spreadsheet URL or ID.
        spreadsheet: String,

        /// Range in A1 notation.
        range: String,

        /// Values as a JSON array of rows, or "-" to read them from stdin.
        #[arg(long)]
        values: String,
    },

    /// Clear the values of a spreadsheet range.
    Clear {
        /// Spreadsheet URL or ID.
        spreadsheet: String,

        /// Range in A1 notation.
        range: String,
    },

    /// Print the A1 key of a cell.
    A1 {
        /// 1-based row number.
        row: u32,

        /// 1-based column number.
        col: u32,

        /// Sheet name to prefix.
        #[arg(long, short = 's')]
        sheet: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "gapiutils=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::A1 { row, col, sheet } = &cli.command {
        println!("{}", number_to_a1(*row, *col, sheet.as_deref())?);
        return Ok(());
    }

    let credentials = cli
        .credentials
        .as_ref()
        .context("No credentials given (use --credentials or GOOGLE_APPLICATION_CREDENTIALS)")?;
    let auth = Authenticator::from_file(credentials)
        .with_context(|| format!("Failed to load credentials from {:?}", credentials))?;

    let mut drive = Drive::new(auth.clone());
    if let Some(drive_id) = cli.drive_id {
        drive = drive.with_shared_drive(drive_id);
    }
    let sheets = Sheets::new(auth);

    match cli.command {
        Commands::List { folder, query } => {
            let files = match (folder, query) {
                (_, Some(query)) => drive
                    .list(&query)
                    .await
                    .with_context(|| format!("Failed to list files matching: {}", query))?,
                (Some(folder), None) => drive
                    .list_children(&folder)
                    .await
                    .with_context(|| format!("Failed to list files in folder: {}", folder))?,
                (None, None) => anyhow::bail!("Give a folder or a --query"),
            };

            if files.is_empty() {
                println!("No files found.");
            } else {
                println!("{:<44} {:>10} {:<30} {}", "ID", "SIZE", "TYPE", "NAME");
                println!("{}", "-".repeat(100));
                for file in files {
                    println!("{}", file);
                }
            }
        }

        Commands::Upload {
            patterns,
            to,
            mime_type,
            no_update,
        } => {
            let files_to_upload = collect_files(&patterns)?;
            if files_to_upload.is_empty() {
                anyhow::bail!("No files to upload");
            }

            let options = UploadOptions {
                mime_type,
                parents: to.into_iter().collect(),
                update: !no_update,
            };

            println!("Uploading {} file(s)...", files_to_upload.len());

            for (idx, file_path) in files_to_upload.iter().enumerate() {
                let filename = file_path.file_name().unwrap_or_default().to_string_lossy();
                print!("[{}/{}] Uploading {}... ", idx + 1, files_to_upload.len(), filename);

                match drive.upload_file(file_path, &options).await {
                    Ok(metadata) => {
                        println!("OK ({})", metadata.id);
                    }
                    Err(e) => {
                        println!("FAILED");
                        eprintln!("  Error: {}", e);
                    }
                }
            }

            println!("Done.");
        }

        Commands::Download {
            file,
            to,
            recursive,
        } => {
            let file_id = extract_id(&file)
                .with_context(|| format!("Invalid file URL or ID: {}", file))?;

            if to.to_string_lossy().ends_with('/') {
                std::fs::create_dir_all(&to)
                    .with_context(|| format!("Failed to create directory: {:?}", to))?;
            }

            let options = DownloadOptions {
                recursive,
                ..DownloadOptions::default()
            };

            print!("Downloading {}... ", file_id);
            let saved = drive
                .download(&file_id, &to, &options)
                .await
                .with_context(|| format!("Failed to download file: {}", file_id))?;

            println!("OK");
            println!("Saved to: {:?}", saved);
        }

        Commands::Copy { file, name, to } => {
            let copied = drive
                .copy(&file, &name, &to)
                .await
                .with_context(|| format!("Failed to copy file: {}", file))?;
            println!("{}", copied);
        }

        Commands::Mkdir { names, parent } => {
            for folder in make_folders(&drive, &names, parent.as_deref()).await? {
                println!("{}", folder);
            }
        }

        Commands::Share {
            file,
            emails,
            role,
            no_notify,
            force,
        } => {
            let options = PermissionOptions {
                role,
                send_notification_email: !no_notify,
                update: force,
            };
            for email in emails {
                let permission = drive
                    .permissions_create(&file, &email, &options)
                    .await
                    .with_context(|| format!("Failed to share {} with {}", file, email))?;
                println!(
                    "{}\t{}\t{}",
                    permission.id.unwrap_or_default(),
                    permission.role,
                    email
                );
            }
        }

        Commands::Permissions { file } => {
            for permission in drive.permissions_list(&file).await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    permission.id.unwrap_or_default(),
                    permission.kind,
                    permission.role,
                    permission.email_address.unwrap_or_default()
                );
            }
        }

        Commands::Values { spreadsheet, range } => {
            for line in value_lines(&sheets, &spreadsheet, &range).await? {
                println!("{}", line);
            }
        }

        Commands::Update {
            spreadsheet,
            range,
            values,
        } => {
            let response = sheets
                .update(&spreadsheet, &range, read_values(&values)?, Default::default())
                .await?;
            println!(
                "Updated {} cell(s) in {}",
                response.updated_cells,
                response.updated_range.unwrap_or(range)
            );
        }

        Commands::Append {
            spreadsheet,
            range,
            values,
        } => {
            let response = sheets
                .append(
                    &spreadsheet,
                    &range,
                    read_values(&values)?,
                    Default::default(),
                    Default::default(),
                )
                .await?;
            let updated = response.updates.map_or(0, |u| u.updated_rows);
            println!("Appended {} row(s)", updated);
        }

        Commands::Clear { spreadsheet, range } => {
            let response = sheets.clear(&spreadsheet, &range).await?;
            println!("Cleared {}", response.cleared_range.unwrap_or(range));
        }

        Commands::A1 { .. } => {}
    }

    Ok(())
}

/// Create folders. Under a parent, names that already exist there are reused.
async fn make_folders(
    drive: &Drive,
    names: &[String],
    parent: Option<&str>,
) -> Result<Vec<FileMetadata>> {
    let Some(parent) = parent else {
        let mut folders = Vec::with_capacity(names.len());
        for name in names {
            let folder = drive
                .create_folder(name, &[])
                .await
                .with_context(|| format!("Failed to create folder: {}", name))?;
            folders.push(folder);
        }
        return Ok(folders);
    };

    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let by_name = drive
        .create_folders_if_not_exists(&refs, parent)
        .await
        .with_context(|| format!("Failed to create folders in: {}", parent))?;

    names
        .iter()
        .map(|name| {
            by_name
                .get(name)
                .cloned()
                .with_context(|| format!("Folder missing after create: {}", name))
        })
        .collect()
}

/// Fetch a range as tab-separated lines. The range is sent as given.
async fn value_lines(sheets: &Sheets, spreadsheet: &str, range: &str) -> Result<Vec<String>> {
    let values = sheets
        .values(spreadsheet, range, Default::default())
        .await
        .with_context(|| format!("Failed to read range: {}", range))?;

    Ok(values
        .values
        .iter()
        .map(|row| {
            row.iter()
                .map(cell_to_string)
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect())
}

/// Expand brace and glob patterns into a sorted, deduplicated list of files.
fn collect_files(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        for expanded_pattern in expand_braces(pattern) {
            let matches: Vec<PathBuf> = glob(&expanded_pattern)
                .with_context(|| format!("Invalid glob pattern: {}", expanded_pattern))?
                .filter_map(|r| r.ok())
                .filter(|p| p.is_file())
                .collect();

            if matches.is_empty() {
                // If no glob matches, treat as literal path
                let path = PathBuf::from(&expanded_pattern);
                if path.is_file() {
                    files.push(path);
                } else {
                    eprintln!("Warning: No files matched pattern: {}", expanded_pattern);
                }
            } else {
                files.extend(matches);
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Parse a JSON array of rows, reading stdin for "-".
fn read_values(arg: &str) -> Result<Vec<Vec<Value>>> {
    let json = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read values from stdin")?;
        buf
    } else {
        arg.to_string()
    };

    serde_json::from_str(&json).context("Values must be a JSON array of rows")
}

/// Expand brace patterns like file_{1,2,3}.txt into multiple patterns.
fn expand_braces(pattern: &str) -> Vec<String> {
    if let Some(start) = pattern.find('{') {
        if let Some(end) = pattern[start..].find('}') {
            let end = start + end;
            let prefix = &pattern[..start];
            let suffix = &pattern[end + 1..];
            let alternatives = &pattern[start + 1..end];

            return alternatives
                .split(',')
                .flat_map(|alt| {
                    let expanded = format!("{}{}{}", prefix, alt.trim(), suffix);
                    expand_braces(&expanded)
                })
                .collect();
        }
    }

    vec![pattern.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_braces_simple() {
        let result = expand_braces("file_{1,2,3}.txt");
        assert_eq!(result, vec!["file_1.txt", "file_2.txt", "file_3.txt"]);
    }

    #[test]
    fn test_expand_braces_no_braces() {
        let result = expand_braces("file.txt");
        assert_eq!(result, vec!["file.txt"]);
    }

    #[test]
    fn test_expand_braces_nested() {
        let result = expand_braces("{a,b}_{1,2}.txt");
        assert_eq!(result, vec!["a_1.txt", "a_2.txt", "b_1.txt", "b_2.txt"]);
    }

    #[test]
    fn test_collect_files_dedups_matches() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.csv", "b.csv", "c.txt"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        let base = dir.path().display();

        let files = collect_files(&[
            format!("{}/*.csv", base),
            format!("{}/{{a,c}}.*", base),
        ])
        .unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "c.txt"]);
    }

    #[test]
    fn test_read_values() {
        let values = read_values(r#"[["a", 1], ["b"]]"#).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0][1], Value::from(1));
        assert!(read_values("{}").is_err());
    }

    #[test]
    fn test_cli_parses_share() {
        let cli = Cli::try_parse_from([
            "gapiutils",
            "--credentials",
            "creds.json",
            "share",
            "file-id",
            "a@b.com",
            "c@d.com",
            "--role",
            "writer",
            "--no-notify",
        ])
        .unwrap();
        match cli.command {
            Commands::Share {
                emails,
                role,
                no_notify,
                ..
            } => {
                assert_eq!(emails, vec!["a@b.com", "c@d.com"]);
                assert_eq!(role, "writer");
                assert!(no_notify);
            }
            _ => panic!("expected share"),
        }
    }

    #[test]
    fn test_cli_keeps_short_sheet_range() {
        let cli = Cli::try_parse_from(["gapiutils", "values", "sheet-id", "Jan"]).unwrap();
        match cli.command {
            Commands::Values { range, .. } => assert_eq!(range, "Jan"),
            _ => panic!("expected values"),
        }
    }

    #[tokio::test]
    async fn test_value_lines_sends_range_unchanged() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/spreadsheets/sheet-id/values/Jan")
            .match_query(mockito::Matcher::Any)
            .with_body(r#"{"range": "Jan!A1:B2", "values": [["a", 1], ["b"]]}"#)
            .create_async()
            .await;

        let sheets = Sheets::new(Authenticator::from_access_token("test-token"))
            .with_base_url(server.url());
        let lines = value_lines(&sheets, "sheet-id", "Jan").await.unwrap();

        mock.assert_async().await;
        assert_eq!(lines, vec!["a\t1", "b"]);
    }

    #[tokio::test]
    async fn test_make_folders_reuses_existing_under_parent() {
        let mut server = mockito::Server::new_async().await;
        let list = server
            .mock("GET", "/files")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"{"files": [{"id": "old1", "name": "2024", "mimeType": "application/vnd.google-apps.folder"}]}"#,
            )
            .expect(1)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/files")
            .match_query(mockito::Matcher::Any)
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "name": "2025",
                "parents": ["parent1"]
            })))
            .with_body(
                r#"{"id": "new1", "name": "2025", "mimeType": "application/vnd.google-apps.folder"}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let drive =
            Drive::new(Authenticator::from_access_token("test-token")).with_base_url(server.url());
        let names = vec!["2024".to_string(), "2025".to_string()];
        let folders = make_folders(&drive, &names, Some("parent1")).await.unwrap();

        list.assert_async().await;
        create.assert_async().await;
        let ids: Vec<_> = folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["old1", "new1"]);
    }
}
