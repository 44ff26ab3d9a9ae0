//! Documented default values for TypeScript compiler options.
//!
//! Entries are listed in the order they appear in the generated table. Link
//! numbering depends on this order, so new options are appended rather than
//! sorted in.

use std::borrow::Cow;

/// Default-value description for a single option.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DefaultValue {
    /// A single sentence rendered verbatim.
    Text(&'static str),
    /// Sentences rendered joined by a single space.
    Sentences(&'static [&'static str]),
    /// `true` when the named option is enabled, `false` otherwise.
    TrueIf(&'static str),
}

impl DefaultValue {
    /// Collapse the value into the single line placed in the table cell.
    pub fn normalize(&self) -> Cow<'static, str> {
        match *self {
            DefaultValue::Text(text) => Cow::Borrowed(text),
            DefaultValue::Sentences(parts) => Cow::Owned(parts.join(" ")),
            DefaultValue::TrueIf(name) => {
                Cow::Owned(format!("`true` if [`{name}`](#{name}); `false` otherwise."))
            }
        }
    }
}

/// An option name paired with its documented default.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OptionEntry {
    pub name: &'static str,
    pub default: DefaultValue,
}

const fn entry(name: &'static str, default: DefaultValue) -> OptionEntry {
    OptionEntry { name, default }
}

use DefaultValue::{Sentences, Text, TrueIf};

/// Defaults as documented by the tsconfig reference.
pub const TSCONFIG_DEFAULTS: &[OptionEntry] = &[
    entry(
        "allowSyntheticDefaultImports",
        Sentences(&[
            "`true` if [`esModuleInterop`](#esModuleInterop) is enabled, [`module`](#module) is `system`, or [`moduleResolution`](#module-resolution) is `bundler`;",
            "`false` otherwise.",
        ]),
    ),
    entry("alwaysStrict", TrueIf("strict")),
    entry("declaration", TrueIf("composite")),
    entry(
        "esModuleInterop",
        Sentences(&[
            "`true` if [`module`](#module) is `node16`, `nodenext`, or `preserve`;",
            "`false` otherwise.",
        ]),
    ),
    entry(
        "exclude",
        Sentences(&[
            "node_modules",
            "bower_components",
            "jspm_packages",
            "[`outDir`](#outDir)",
        ]),
    ),
    entry(
        "include",
        Sentences(&["`[]` if [`files`](#files) is specified;", "`**/*` otherwise."]),
    ),
    entry("incremental", TrueIf("composite")),
    entry("isolatedModules", TrueIf("verbatimModuleSyntax")),
    entry("jsxFactory", Text("React.createElement")),
    entry("locale", Text("Platform specific.")),
    entry(
        "module",
        Sentences(&[
            "`CommonJS` if [`target`](#target) is `ES5`;",
            "`ES6`/`ES2015` otherwise.",
        ]),
    ),
    entry(
        "moduleResolution",
        Sentences(&[
            "`Node10` if [`module`](#module) is `CommonJS`;",
            "`Node16` if [`module`](#module) is `Node16`, `Node18`, or `Node20`;",
            "`NodeNext` if [`module`](#module) is `NodeNext`;",
            "`Bundler` if [`module`](#module) is `Preserve`;",
            "`Classic` otherwise.",
        ]),
    ),
    entry("newLine", Text("`lf`")),
    entry("noImplicitAny", TrueIf("strict")),
    entry("noImplicitThis", TrueIf("strict")),
    entry("preserveConstEnums", TrueIf("isolatedModules")),
    entry("reactNamespace", Text("React")),
    entry(
        "resolvePackageJsonExports",
        Sentences(&[
            "`true` when [`moduleResolution`](#moduleResolution) is `node16`, `nodenext`, or `bundler`;",
            "otherwise `false`",
        ]),
    ),
    entry(
        "resolvePackageJsonImports",
        Sentences(&[
            "`true` when [`moduleResolution`](#moduleResolution) is `node16`, `nodenext`, or `bundler`;",
            "otherwise `false`",
        ]),
    ),
    entry("rootDir", Text("Computed from the list of input files.")),
    entry("rootDirs", Text("Computed from the list of input files.")),
    entry("strictBindCallApply", TrueIf("strict")),
    entry("strictBuiltinIteratorReturn", TrueIf("strict")),
    entry("strictFunctionTypes", TrueIf("strict")),
    entry("useUnknownInCatchVariables", TrueIf("strict")),
    entry("strictPropertyInitialization", TrueIf("strict")),
    entry("strictNullChecks", TrueIf("strict")),
    entry(
        "target",
        Sentences(&[
            "`es2023` if [`module`](#module) is `node20`;",
            "`esnext` if [`module`](#module) is `nodenext`;",
            "`ES5` otherwise.",
        ]),
    ),
    entry(
        "useDefineForClassFields",
        Sentences(&[
            "`true` if [`target`](#target) is `ES2022` or higher, including `ESNext`;",
            "`false` otherwise.",
        ]),
    ),
    entry(
        "allowImportingTsExtensions",
        TrueIf("rewriteRelativeImportExtensions"),
    ),
];
