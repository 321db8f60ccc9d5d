//! Built-in local task engine
//!
//! Performs a small set of Ant-style tasks directly on the file system,
//! rooted at a base directory. Relative paths in attributes resolve against
//! that directory. Unknown task names are reported as
//! [`TaskError::NotFound`], which the resolver turns back into a missing
//! method.

mod fileset;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

pub use fileset::FileSet;

use crate::console::Console;
use crate::core::models::{Value, Verbosity};
use crate::core::ports::{TaskEngine, TaskError, TaskInvocation};
use crate::core::services::task_header;

/// Task engine operating on the local file system
#[derive(Debug, Clone)]
pub struct LocalTaskEngine {
    base_dir: PathBuf,
    properties: BTreeMap<String, String>,
}

impl LocalTaskEngine {
    /// Create an engine rooted at `base_dir`
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let mut properties = BTreeMap::new();
        properties.insert("basedir".to_string(), base_dir.to_string_lossy().to_string());
        Self {
            base_dir,
            properties,
        }
    }

    /// Create an engine rooted at the current working directory
    pub fn current_dir() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// The directory relative paths resolve against
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// All defined properties
    #[must_use]
    pub const fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Define a property; the first definition wins
    ///
    /// Returns `false` if the property was already set.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.properties.contains_key(&name) {
            log::debug!("property {name} already set, keeping the first definition");
            return false;
        }
        self.properties.insert(name, value.into());
        true
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn echo(task: &TaskInvocation, console: &Console) -> Result<Value, TaskError> {
        let message = task.attribute("message").unwrap_or_default();
        let priority = match task.attribute("level").as_deref() {
            Some("error") => Verbosity::ErrorsOnly,
            Some("warning") => Verbosity::WarningsAndErrors,
            Some("verbose") => Verbosity::Verbose,
            Some("debug") => Verbosity::Debug,
            _ => Verbosity::Normal,
        };
        for line in message.lines() {
            console.message(priority, &format!("{}{line}", task_header("echo")));
        }
        Ok(Value::Nil)
    }

    fn property(&mut self, task: &TaskInvocation) -> Result<Value, TaskError> {
        if let Some(prefix) = task.attribute("environment") {
            for (key, value) in std::env::vars() {
                self.define(format!("{prefix}.{key}"), value);
            }
            return Ok(Value::Nil);
        }

        if let Some(file) = task.attribute("file") {
            let path = self.resolve(&file);
            let content = fs::read_to_string(&path).map_err(|e| io_failure(task, &path, &e))?;
            for (key, value) in parse_properties(&content) {
                self.define(key, value);
            }
            return Ok(Value::Nil);
        }

        let name = task.require("name")?;
        let value = if let Some(value) = task.attribute("value") {
            value
        } else if let Some(location) = task.attribute("location") {
            self.resolve(&location).to_string_lossy().to_string()
        } else {
            return Err(TaskError::failed(
                &task.name,
                "You must specify value, location, file or environment \
                 when using the name attribute",
            ));
        };
        self.define(name, value);
        Ok(Value::Nil)
    }

    fn mkdir(&self, task: &TaskInvocation, console: &Console) -> Result<Value, TaskError> {
        let dir = self.resolve(&task.require("dir")?);
        if !dir.is_dir() {
            fs::create_dir_all(&dir).map_err(|e| io_failure(task, &dir, &e))?;
            console.message(
                Verbosity::Normal,
                &format!("{}Created dir: {}", task_header("mkdir"), dir.display()),
            );
        }
        Ok(Value::Nil)
    }

    fn touch(&self, task: &TaskInvocation) -> Result<Value, TaskError> {
        let file = self.resolve(&task.require("file")?);
        ensure_parent(task, &file)?;
        let handle = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
            .map_err(|e| io_failure(task, &file, &e))?;
        handle.set_modified(SystemTime::now()).map_err(|e| io_failure(task, &file, &e))?;
        Ok(Value::Nil)
    }

    fn delete(&self, task: &TaskInvocation, console: &Console) -> Result<Value, TaskError> {
        let failonerror = task.flag("failonerror", true);
        let (path, result) = if let Some(file) = task.attribute("file") {
            let path = self.resolve(&file);
            let result = fs::remove_file(&path);
            (path, result)
        } else if let Some(dir) = task.attribute("dir") {
            let path = self.resolve(&dir);
            let result = fs::remove_dir_all(&path);
            (path, result)
        } else {
            return Err(TaskError::failed(&task.name, "file or dir attribute must be set"));
        };

        match result {
            Ok(()) => {
                console.message(
                    Verbosity::Normal,
                    &format!("{}Deleting: {}", task_header("delete"), path.display()),
                );
                Ok(Value::Nil)
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Value::Nil),
            Err(e) if failonerror => Err(io_failure(task, &path, &e)),
            Err(e) => {
                log::warn!("delete of {} failed: {e}", path.display());
                Ok(Value::Nil)
            },
        }
    }

    /// Source and destination pairs for `copy` and `move`
    fn transfers(&self, task: &TaskInvocation) -> Result<Vec<(PathBuf, PathBuf)>, TaskError> {
        let mut pairs = Vec::new();

        if let Some(file) = task.attribute("file") {
            let source = self.resolve(&file);
            let destination = if let Some(tofile) = task.attribute("tofile") {
                self.resolve(&tofile)
            } else if let Some(todir) = task.attribute("todir") {
                let name = source.file_name().ok_or_else(|| {
                    TaskError::failed(&task.name, format!("{file} does not name a file"))
                })?;
                self.resolve(&todir).join(name)
            } else {
                return Err(TaskError::failed(
                    &task.name,
                    "one of tofile or todir must be set",
                ));
            };
            pairs.push((source, destination));
        }

        let filesets: Vec<&TaskInvocation> = task.children_named("fileset").collect();
        if !filesets.is_empty() {
            let todir = self.resolve(&task.require("todir")?);
            for element in filesets {
                let set = FileSet::from_element(element, &self.base_dir)?;
                for relative in set.files()? {
                    pairs.push((set.dir().join(&relative), todir.join(&relative)));
                }
            }
        }

        if let Some(unsupported) = task.children.iter().find(|c| c.name != "fileset") {
            return Err(TaskError::failed(
                &task.name,
                format!(
                    "{} doesn't support the nested \"{}\" element.",
                    task.name, unsupported.name
                ),
            ));
        }
        if task.attribute("file").is_none() && task.children.is_empty() {
            return Err(TaskError::failed(
                &task.name,
                "Specify at least one source--a file or a fileset.",
            ));
        }
        Ok(pairs)
    }

    fn copy(&self, task: &TaskInvocation, console: &Console) -> Result<Value, TaskError> {
        let pairs = self.transfers(task)?;
        for (source, destination) in &pairs {
            ensure_parent(task, destination)?;
            fs::copy(source, destination).map_err(|e| io_failure(task, source, &e))?;
            log::debug!("copied {} to {}", source.display(), destination.display());
        }
        if !pairs.is_empty() {
            console.message(
                Verbosity::Normal,
                &format!("{}Copying {} file(s)", task_header("copy"), pairs.len()),
            );
        }
        Ok(Value::Int(i64::try_from(pairs.len()).unwrap_or(i64::MAX)))
    }

    fn rename(&self, task: &TaskInvocation, console: &Console) -> Result<Value, TaskError> {
        let pairs = self.transfers(task)?;
        for (source, destination) in &pairs {
            ensure_parent(task, destination)?;
            if fs::rename(source, destination).is_err() {
                fs::copy(source, destination).map_err(|e| io_failure(task, source, &e))?;
                fs::remove_file(source).map_err(|e| io_failure(task, source, &e))?;
            }
        }
        if !pairs.is_empty() {
            console.message(
                Verbosity::Normal,
                &format!("{}Moving {} file(s)", task_header("move"), pairs.len()),
            );
        }
        Ok(Value::Nil)
    }

    fn tstamp(&mut self) -> Value {
        let now = chrono::Local::now();
        self.define("DSTAMP", now.format("%Y%m%d").to_string());
        self.define("TSTAMP", now.format("%H%M").to_string());
        self.define("TODAY", now.format("%B %d %Y").to_string());
        Value::Nil
    }

    fn exec(&mut self, task: &TaskInvocation, console: &Console) -> Result<Value, TaskError> {
        let executable = task.require("executable")?;
        let dir = task.attribute("dir").map_or_else(|| self.base_dir.clone(), |d| self.resolve(&d));

        let mut args = Vec::new();
        for arg in task.children_named("arg") {
            if let Some(value) = arg.attribute("value") {
                args.push(value);
            } else if let Some(line) = arg.attribute("line") {
                args.extend(line.split_whitespace().map(String::from));
            }
        }

        log::debug!("exec {executable} {args:?} in {}", dir.display());
        let output = Command::new(&executable)
            .args(&args)
            .current_dir(&dir)
            .output()
            .map_err(|e| TaskError::failed(&task.name, format!("Execute failed: {e}")))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            console.message(Verbosity::Normal, &format!("{}{line}", task_header("exec")));
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            let line = format!("{}{line}", task_header("exec"));
            console.message(Verbosity::WarningsAndErrors, &line);
        }

        let code = output.status.code().unwrap_or(-1);
        if let Some(property) = task.attribute("resultproperty") {
            self.define(property, code.to_string());
        }
        if code != 0 && task.flag("failonerror", false) {
            return Err(TaskError::failed(&task.name, format!("exec returned: {code}")));
        }
        Ok(Value::Int(i64::from(code)))
    }

    fn sequential(&mut self, task: &TaskInvocation, console: &Console) -> Result<Value, TaskError> {
        let mut last = Value::Nil;
        for child in &task.children {
            last = self.execute(child, console)?;
        }
        Ok(last)
    }
}

impl TaskEngine for LocalTaskEngine {
    fn execute(&mut self, task: &TaskInvocation, console: &Console) -> Result<Value, TaskError> {
        match task.name.as_str() {
            "echo" => Self::echo(task, console),
            "property" => self.property(task),
            "mkdir" => self.mkdir(task, console),
            "touch" => self.touch(task),
            "delete" => self.delete(task, console),
            "copy" => self.copy(task, console),
            "move" => self.rename(task, console),
            "tstamp" => Ok(self.tstamp()),
            "exec" => self.exec(task, console),
            "sequential" => self.sequential(task, console),
            "fail" => Err(TaskError::failed(
                &task.name,
                task.attribute("message").unwrap_or_else(|| "No message".to_string()),
            )),
            other => Err(TaskError::NotFound(other.to_string())),
        }
    }

    fn property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }
}

fn ensure_parent(task: &TaskInvocation, path: &Path) -> Result<(), TaskError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| io_failure(task, parent, &e))
        },
        _ => Ok(()),
    }
}

fn io_failure(task: &TaskInvocation, path: &Path, e: &io::Error) -> TaskError {
    TaskError::failed(&task.name, format!("{}: {e}", path.display()))
}

/// Parse `key=value` lines, skipping blanks and `#` / `!` comments
fn parse_properties(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let (key, value) = line.split_once(['=', ':'])?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
