use crate::config::ShellConfig;
use crate::executor::{Console, Executor};
use crate::parser::parse;
use crate::types::Outcome;
use std::cell::RefCell;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Mutex, MutexGuard};

mod quote_tests;

/// In-memory console stream that stays readable after being handed out.
#[derive(Clone, Default)]
pub struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Harness {
    pub executor: Executor,
    pub out: SharedBuf,
    pub err: SharedBuf,
}

impl Harness {
    pub fn new(config: ShellConfig) -> Self {
        let out = SharedBuf::default();
        let err = SharedBuf::default();
        let console = Console {
            out: Box::new(out.clone()),
            err: Box::new(err.clone()),
        };
        Self {
            executor: Executor::new(config, console),
            out,
            err,
        }
    }

    pub fn system() -> Self {
        Self::new(system_config())
    }

    pub fn run(&mut self, line: &str) -> Outcome {
        self.executor.execute(parse(line))
    }
}

pub fn system_config() -> ShellConfig {
    let path = env::var_os("PATH").unwrap_or_else(|| "/usr/local/bin:/usr/bin:/bin".into());
    ShellConfig::default().with_search_path(path)
}

static CWD: Mutex<()> = Mutex::new(());

/// Serialises tests that depend on the process working directory and puts
/// the directory back when dropped.
pub struct CwdGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl CwdGuard {
    pub fn acquire() -> Self {
        let lock = CWD.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Self {
            original: env::current_dir().unwrap(),
            _lock: lock,
        }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.original);
    }
}
