// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-module keyword patterns for the fast classification pass.
//!
//! Each module carries a list of regexes matched case-insensitively against
//! the normalized message. The pattern pass costs microseconds and handles
//! the overwhelming majority of traffic without an inference call.

/// Module tag used when nothing else matches.
pub const FALLBACK_MODULE: &str = "atendimento";

/// (module, patterns) table. Order matters only for ties: earlier modules
/// win when match counts are equal.
pub const MODULE_PATTERNS: &[(&str, &[&str])] = &[
    (
        "professor",
        &[
            r"\bd[uú]vida\b",
            r"\bexplica\w*\b",
            r"\bmat[eé]ria\b",
            r"\bexerc[ií]cio\b",
            r"\bli[çc][ãa]o\b",
            r"\bcapital d[eoa]\b",
            r"\bo que [ée]\b",
            r"\bhist[oó]ria\b",
            r"\bgeografia\b",
            r"\bmatem[aá]tica\b",
            r"\bf[ií]sica\b",
            r"\bqu[ií]mica\b",
        ],
    ),
    (
        "enem",
        &[
            r"\benem\b",
            r"\bvestibular\b",
            r"\bsimulado\b",
            r"\bquest[õo]es? de prova\b",
            r"\bgabarito\b",
            r"\btri\b",
        ],
    ),
    (
        "aula_interativa",
        &[
            r"\baula interativa\b",
            r"\bslides?\b",
            r"\bplano de aula\b",
            r"\bapresenta[çc][ãa]o\b",
        ],
    ),
    (
        "redacao",
        &[
            r"\breda[çc][ãa]o\b",
            r"\bdisserta[çc][ãa]o\b",
            r"\bcorrig\w+ (meu|minha|o|a) texto\b",
            r"\btema de reda[çc][ãa]o\b",
        ],
    ),
    (
        "ti",
        &[
            r"\bcomputador\b",
            r"\bimpressora\b",
            r"\binternet\b",
            r"\bwi-?fi\b",
            r"\bsenha\b",
            r"\bsistema\b",
            r"\blogin\b",
            r"\bn[ãa]o funciona\b",
            r"\btravou\b",
        ],
    ),
    (
        "financeiro",
        &[
            r"\bmensalidade\b",
            r"\bboleto\b",
            r"\bpagamento\b",
            r"\bdesconto\b",
            r"\bbolsa\b",
            r"\binadimpl\w+\b",
            r"\bfinanceir\w+\b",
        ],
    ),
    (
        "rh",
        &[
            r"\bsal[aá]rio\b",
            r"\bf[eé]rias\b",
            r"\bcontrata[çc][ãa]o\b",
            r"\bfolha de pagamento\b",
            r"\bbenef[ií]cios?\b",
            r"\bfuncion[aá]rios?\b",
        ],
    ),
    (
        "social_media",
        &[
            r"\binstagram\b",
            r"\bpost\b",
            r"\brede social\b",
            r"\bredes sociais\b",
            r"\blegenda\b",
            r"\bstories\b",
        ],
    ),
    (
        "bem_estar",
        &[
            r"\bansiedade\b",
            r"\bestresse\b",
            r"\bbullying\b",
            r"\bsa[uú]de mental\b",
            r"\bacolhimento\b",
        ],
    ),
    (
        "coordenacao",
        &[
            r"\bcoordena[çc][ãa]o\b",
            r"\bcal[eê]ndario escolar\b",
            r"\bgrade curricular\b",
            r"\bconselho de classe\b",
        ],
    ),
    (
        "secretaria",
        &[
            r"\bmatr[ií]cula\b",
            r"\bdeclara[çc][ãa]o\b",
            r"\bhist[oó]rico escolar\b",
            r"\btransfer[eê]ncia\b",
            r"\bdocumentos?\b",
        ],
    ),
    (
        "conteudo_midia",
        &[
            r"\bv[ií]deo\b",
            r"\bimagem\b",
            r"\bfoto\b",
            r"\bilustra[çc][ãa]o\b",
            r"\b[aá]udio\b",
        ],
    ),
];

/// Phrasings that suggest the answer benefits from visual material.
pub const VISUAL_INTENT_PATTERNS: &[&str] = &[
    r"\bcomo funciona\b",
    r"\bestrutura\b",
    r"\bdiagrama\b",
    r"\bmostre\b",
    r"\bdesenh\w+\b",
    r"\bmapa\b",
    r"\besquema\b",
];
