//! Table de codage SAFE-DNA
//!
//! Bijection fixe entre 49 caractères et des triplets de bases:
//! - aucun codon d'initiation (ATG, GTG, TTG) n'est utilisé;
//! - les codons stop (TAA, TAG, TGA) codent des caractères ordinaires,
//!   le fragment n'étant jamais lu comme cadre de lecture ouvert.

/// Lettres A-Z
pub const LETTERS: [(char, &str); 26] = [
    ('A', "ACC"), ('B', "AGT"), ('C', "CAT"), ('D', "CCA"), ('E', "CGT"), ('F', "CGA"),
    ('G', "CGC"), ('H', "CGG"), ('I', "CTA"), ('J', "CTC"), ('K', "CTG"), ('L', "GAC"),
    ('M', "GCA"), ('N', "GCC"), ('O', "GCG"), ('P', "GCT"), ('Q', "GGA"), ('R', "GGC"),
    ('S', "GGG"), ('T', "GTC"), ('U', "GTT"), ('V', "TAA"), ('W', "TAG"), ('X', "TCA"),
    ('Y', "TCC"), ('Z', "TCG"),
];

/// Chiffres 0-9
pub const DIGITS: [(char, &str); 10] = [
    ('0', "ACA"), ('1', "ACG"), ('2', "ACT"), ('3', "AGA"), ('4', "AGC"),
    ('5', "AGG"), ('6', "CAA"), ('7', "CAC"), ('8', "CAG"), ('9', "CCT"),
];

/// Ponctuation et espace
pub const PUNCTUATION: [(char, &str); 13] = [
    ('.', "TGA"), (',', "TCT"), ('?', "TGC"), ('!', "TGG"), ('-', "AAC"), ('_', "AAG"),
    ('(', "AAT"), (')', "ATA"), ('[', "ATC"), (']', "ATT"), ('@', "CCC"), ('/', "GAG"),
    (' ', "AAA"),
];

/// Codons d'initiation jamais attribués
pub const START_CODONS: [&str; 3] = ["ATG", "GTG", "TTG"];

/// Codons stop réutilisés comme caractères
pub const STOP_CODONS: [&str; 3] = ["TAA", "TAG", "TGA"];

/// Itère sur toute la table dans l'ordre canonique (lettres, chiffres, ponctuation)
pub fn entries() -> impl Iterator<Item = (char, &'static str)> {
    LETTERS
        .iter()
        .chain(DIGITS.iter())
        .chain(PUNCTUATION.iter())
        .copied()
}
