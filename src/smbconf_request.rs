use std::io::Read;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::smbconf_applier::ApplyError;

/// `net conf` subcommand issued once per parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfVerb {
    SetParm,
    DelParm,
}

impl ConfVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfVerb::SetParm => "setparm",
            ConfVerb::DelParm => "delparm",
        }
    }
}

impl std::fmt::Display for ConfVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parameter to touch within a section. `value` is `None` for deletions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParmStep<'a> {
    pub parm: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> ParmStep<'a> {
    /// Argument vector handed to the `net` binary, one entry per argument.
    pub fn args(&self, verb: ConfVerb, section: &'a str) -> Vec<&'a str> {
        let mut args = vec!["conf", verb.as_str(), section, self.parm];
        if let Some(value) = self.value {
            args.push(value);
        }
        args
    }
}

/// A request document read from stdin.
pub trait ParmRequest: DeserializeOwned {
    const VERB: ConfVerb;

    fn section(&self) -> &str;

    /// Steps in application order.
    fn steps(&self) -> Vec<ParmStep<'_>>;
}

/// `{"section": "...", "parms": {"name": "value", ...}}`
///
/// `parms` keeps document order; a repeated key keeps its first position and its last value.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SetParmsRequest {
    pub section: String,
    pub parms: IndexMap<String, String>,
}

impl ParmRequest for SetParmsRequest {
    const VERB: ConfVerb = ConfVerb::SetParm;

    fn section(&self) -> &str {
        &self.section
    }

    fn steps(&self) -> Vec<ParmStep<'_>> {
        self.parms
            .iter()
            .map(|(parm, value)| ParmStep {
                parm: parm.as_str(),
                value: Some(value.as_str()),
            })
            .collect()
    }
}

/// `{"section": "...", "parms": ["name", ...]}`
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DelParmsRequest {
    pub section: String,
    pub parms: Vec<String>,
}

impl ParmRequest for DelParmsRequest {
    const VERB: ConfVerb = ConfVerb::DelParm;

    fn section(&self) -> &str {
        &self.section
    }

    fn steps(&self) -> Vec<ParmStep<'_>> {
        self.parms
            .iter()
            .map(|parm| ParmStep {
                parm: parm.as_str(),
                value: None,
            })
            .collect()
    }
}

/// Reads the whole stream as a single JSON document.
pub fn parse_request<Req: ParmRequest>(input: impl Read) -> Result<Req, ApplyError> {
    let request: Req = serde_json::from_reader(input)
        .map_err(|e| ApplyError::MalformedInput(e.to_string()))?;
    if request.section().is_empty() {
        return Err(ApplyError::MalformedInput(
            "section must not be empty".to_string(),
        ));
    }
    Ok(request)
}
